use fixedbitset::FixedBitSet;

use crate::ecs::system::{self, Registry};

/// Declared system-to-system edges, as an adjacency matrix.
///
/// Row `i` holds the ids system `i` waits for. The matrix is only the source of truth; the
/// per-system lists the readiness check walks are rebuilt from it, lazily, when it changes.
#[derive(Default)]
pub(crate) struct Dependencies {
    matrix: Vec<FixedBitSet>,
    dirty: bool,
}

impl Dependencies {
    /// Record that `system` depends on each of `dependencies`.
    pub fn add(&mut self, system: system::Id, dependencies: &[system::Id]) {
        if dependencies.is_empty() {
            return;
        }
        if self.matrix.len() <= system.index() {
            self.matrix
                .resize_with(system.index() + 1, FixedBitSet::new);
        }

        let row = &mut self.matrix[system.index()];
        for dependency in dependencies {
            row.grow(dependency.index() + 1);
            row.insert(dependency.index());
        }
        self.dirty = true;
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Push the matrix into every registered system's dependency list and clear the dirty flag.
    ///
    /// Edges to systems that are not registered are left out.
    pub fn rebuild(&mut self, systems: &mut Registry) {
        let ids: Vec<system::Id> = systems.ids().collect();
        let mut edges = 0;

        for id in ids {
            let dependencies: Vec<system::Id> = self
                .matrix
                .get(id.index())
                .map(|row| {
                    row.ones()
                        .map(|index| system::Id::new(index as u32))
                        .filter(|dependency| systems.contains(*dependency))
                        .collect()
                })
                .unwrap_or_default();

            edges += dependencies.len();
            systems.set_dependencies(id, dependencies);
        }

        log::debug!(
            "rebuilt dependency graph: {} system(s), {edges} edge(s)",
            systems.len()
        );
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{System, World};

    struct A;
    struct B;
    struct C;

    impl System for A {
        fn update(&mut self, _world: &mut World) {}
    }
    impl System for B {
        fn update(&mut self, _world: &mut World) {}
    }
    impl System for C {
        fn update(&mut self, _world: &mut World) {}
    }

    #[test]
    fn rebuild_drops_unregistered_edges() {
        // Given
        let mut systems = Registry::new();
        let (a, _) = systems.insert(A);
        let (b, _) = systems.insert(B);
        let c = systems.id_of::<C>();
        let mut dependencies = Dependencies::default();
        dependencies.add(b, &[c, a]);

        // When
        assert!(dependencies.is_dirty());
        dependencies.rebuild(&mut systems);

        // Then
        assert!(!dependencies.is_dirty());
        assert_eq!(systems.dependencies(b), &[a]);
        assert!(systems.dependencies(a).is_empty());
    }

    #[test]
    fn late_registration_is_picked_up_on_next_rebuild() {
        // Given
        let mut systems = Registry::new();
        let (a, _) = systems.insert(A);
        let c = systems.id_of::<C>();
        let mut dependencies = Dependencies::default();
        dependencies.add(a, &[c]);
        dependencies.rebuild(&mut systems);
        assert!(systems.dependencies(a).is_empty());

        // When
        systems.insert(C);
        dependencies.mark_dirty();
        dependencies.rebuild(&mut systems);

        // Then
        assert_eq!(systems.dependencies(a), &[c]);
    }

    #[test]
    fn empty_add_keeps_graph_clean() {
        let mut dependencies = Dependencies::default();

        dependencies.add(system::Id::new(0), &[]);

        assert!(!dependencies.is_dirty());
    }
}
