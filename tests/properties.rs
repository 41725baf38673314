use petgraph::graph::{EdgeIndex, NodeIndex};
use quickcheck::{quickcheck, Arbitrary, Gen};

use molgraph::{
    Atom, AtomGraph, Bond, BondOrder, EdgeBits, Element, MatchConfig, Matcher, MoleculeGraph,
};

/// A connected carbon skeleton: a random spanning tree plus a few chords.
#[derive(Clone, Debug)]
struct Skeleton(AtomGraph);

impl Arbitrary for Skeleton {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = 1 + usize::arbitrary(g) % 10;
        let mut graph = AtomGraph::new();
        let atoms: Vec<NodeIndex> = (0..n)
            .map(|_| graph.add_atom(Atom::new(Element::C).with_hydrogens(u8::arbitrary(g) % 3)))
            .collect();

        for i in 1..n {
            let parent = usize::arbitrary(g) % i;
            graph.add_bond(atoms[parent], atoms[i], Bond::single()).unwrap();
        }

        let chords = usize::arbitrary(g) % 5;
        for _ in 0..chords {
            let a = usize::arbitrary(g) % n;
            let b = usize::arbitrary(g) % n;
            if a != b && graph.bond_between(atoms[a], atoms[b]).is_none() {
                graph.add_bond(atoms[a], atoms[b], Bond::single()).unwrap();
            }
        }
        Skeleton(graph)
    }
}

impl Skeleton {
    fn molecule(&self) -> MoleculeGraph {
        MoleculeGraph::from_graph(self.0.clone()).unwrap()
    }
}

/// A small connected graph of carbon and nitrogen atoms with single and
/// double bonds.
#[derive(Clone, Debug)]
struct Labelled {
    elements: Vec<Element>,
    bonds: Vec<(usize, usize, BondOrder)>,
}

impl Labelled {
    fn arbitrary_with(g: &mut Gen, max_atoms: usize) -> Self {
        let n = 1 + usize::arbitrary(g) % max_atoms;
        let elements = (0..n)
            .map(|_| *g.choose(&[Element::C, Element::N]).unwrap())
            .collect();
        let mut bonds = Vec::new();
        let order = |g: &mut Gen| *g.choose(&[BondOrder::Single, BondOrder::Double]).unwrap();
        for i in 1..n {
            bonds.push((usize::arbitrary(g) % i, i, order(g)));
        }
        for _ in 0..usize::arbitrary(g) % 3 {
            let a = usize::arbitrary(g) % n;
            let b = usize::arbitrary(g) % n;
            let taken = bonds
                .iter()
                .any(|&(x, y, _)| (x, y) == (a, b) || (x, y) == (b, a));
            if a != b && !taken {
                bonds.push((a, b, order(g)));
            }
        }
        Labelled { elements, bonds }
    }

    fn molecule(&self) -> MoleculeGraph {
        let mut graph = AtomGraph::new();
        let atoms: Vec<NodeIndex> = self
            .elements
            .iter()
            .map(|&e| graph.add_atom(Atom::new(e)))
            .collect();
        for &(a, b, order) in &self.bonds {
            graph.add_bond(atoms[a], atoms[b], Bond::new(order)).unwrap();
        }
        MoleculeGraph::from_graph(graph).unwrap()
    }

    fn adjacency(&self) -> Vec<Vec<Option<BondOrder>>> {
        let n = self.elements.len();
        let mut adj = vec![vec![None; n]; n];
        for &(a, b, order) in &self.bonds {
            adj[a][b] = Some(order);
            adj[b][a] = Some(order);
        }
        adj
    }
}

#[derive(Clone, Debug)]
struct SmallPattern(Labelled);

impl Arbitrary for SmallPattern {
    fn arbitrary(g: &mut Gen) -> Self {
        SmallPattern(Labelled::arbitrary_with(g, 4))
    }
}

#[derive(Clone, Debug)]
struct SmallTarget(Labelled);

impl Arbitrary for SmallTarget {
    fn arbitrary(g: &mut Gen) -> Self {
        SmallTarget(Labelled::arbitrary_with(g, 5))
    }
}

/// Counts injective, element-preserving maps from `pattern` into `target`
/// under which every pattern bond lands on a target bond of the same order.
/// With `induced`, target bonds between mapped atoms must also be pattern
/// bonds.
fn count_embeddings(pattern: &Labelled, target: &Labelled, induced: bool) -> usize {
    fn extend(
        next: usize,
        image: &mut Vec<usize>,
        pattern: &Labelled,
        target: &Labelled,
        p_adj: &[Vec<Option<BondOrder>>],
        t_adj: &[Vec<Option<BondOrder>>],
        induced: bool,
    ) -> usize {
        if next == pattern.elements.len() {
            return 1;
        }
        let mut total = 0;
        for m in 0..target.elements.len() {
            if image.contains(&m) || pattern.elements[next] != target.elements[m] {
                continue;
            }
            let consistent = image.iter().enumerate().all(|(n, &mn)| {
                match (p_adj[next][n], t_adj[m][mn]) {
                    (Some(p), Some(t)) => p == t,
                    (Some(_), None) => false,
                    (None, Some(_)) => !induced,
                    (None, None) => true,
                }
            });
            if consistent {
                image.push(m);
                total += extend(next + 1, image, pattern, target, p_adj, t_adj, induced);
                image.pop();
            }
        }
        total
    }

    let p_adj = pattern.adjacency();
    let t_adj = target.adjacency();
    extend(0, &mut Vec::new(), pattern, target, &p_adj, &t_adj, induced)
}

/// Rank of a set of edge vectors over GF(2).
fn rank(vectors: &[EdgeBits]) -> usize {
    let mut pivots: Vec<EdgeBits> = Vec::new();
    for v in vectors {
        let mut v = v.clone();
        while let Some(lead) = v.leading_bit() {
            match pivots.iter().find(|p| p.leading_bit() == Some(lead)) {
                Some(p) => v.xor_assign(p),
                None => break,
            }
        }
        if !v.is_empty() {
            pivots.push(v);
        }
    }
    pivots.len()
}

quickcheck! {
    fn prop_basis_never_exceeds_cyclomatic_number(s: Skeleton) -> bool {
        let mol = s.molecule();
        let basis = mol.cycle_basis();
        basis.len() <= basis.expected()
            && basis.expected() == mol.cyclomatic_number()
            && basis.is_complete() == (basis.len() == mol.cyclomatic_number())
    }

    fn prop_basis_rings_are_simple_cycles(s: Skeleton) -> bool {
        let mol = s.molecule();
        mol.cycle_basis().rings().iter().all(|ring| {
            let atoms = ring.atoms();
            let closed = (0..atoms.len()).all(|i| {
                mol.graph()
                    .bond_between(atoms[i], atoms[(i + 1) % atoms.len()])
                    .is_some()
            });
            closed && ring.len() >= 3 && ring.edges().len() == ring.len()
        })
    }

    fn prop_basis_rings_are_independent(s: Skeleton) -> bool {
        let mol = s.molecule();
        let vectors: Vec<EdgeBits> = mol
            .cycle_basis()
            .rings()
            .iter()
            .map(|ring| EdgeBits::from_ring(mol.graph(), ring.atoms()))
            .collect();
        rank(&vectors) == vectors.len()
    }

    fn prop_bfs_not_longer_than_dfs_tree(s: Skeleton) -> bool {
        let mol = s.molecule();
        let tree = mol.depth_first_search(NodeIndex::new(0));
        let ok = mol.graph().atoms().all(|a| {
            mol.graph().atoms().all(|b| {
                match (mol.shortest_path(a, b), tree.tree_path(a, b)) {
                    (Some(bfs), Some(dfs)) => bfs.len() <= dfs.len(),
                    _ => false,
                }
            })
        });
        ok
    }

    fn prop_dfs_back_edges_equal_cyclomatic_number(s: Skeleton) -> bool {
        let mol = s.molecule();
        let tree = mol.depth_first_search(NodeIndex::new(0));
        tree.back_edges.len() == mol.cyclomatic_number()
            && tree.tree_edges.len() + 1 == mol.atom_count()
            && tree.order.len() == mol.atom_count()
    }

    fn prop_edge_bits_round_trip(edges: Vec<u8>) -> bool {
        let mut expected: Vec<EdgeIndex> =
            edges.iter().map(|&e| EdgeIndex::new(e as usize)).collect();
        expected.sort();
        expected.dedup();
        let bits = EdgeBits::from_edges(256, expected.iter().copied());
        bits.count() == expected.len() && bits.to_edges() == expected
    }

    fn prop_molecule_contains_itself(s: Skeleton) -> bool {
        let mol = s.molecule();
        let matcher = Matcher::new(&mol, &mol).unwrap();
        matcher.is_sub() && matcher.sub_count_unique() == 1
    }

    fn prop_unique_count_bounded_by_count(a: Skeleton, b: Skeleton) -> bool {
        let pattern = a.molecule();
        let target = b.molecule();
        let matcher = Matcher::new(&pattern, &target).unwrap();
        let count = matcher.sub_count();
        let unique = matcher.sub_count_unique();
        unique <= count && (count > 0) == matcher.is_sub()
    }

    fn prop_count_agrees_with_exhaustive_enumeration(p: SmallPattern, t: SmallTarget) -> bool {
        let pattern = p.0.molecule();
        let target = t.0.molecule();
        let config = MatchConfig::default().with_hybridization(false);
        [false, true].iter().all(|&induced| {
            let matcher = Matcher::new(&pattern, &target)
                .unwrap()
                .with_config(config.induced(induced));
            matcher.sub_count() == count_embeddings(&p.0, &t.0, induced)
        })
    }
}
