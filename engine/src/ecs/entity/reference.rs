use crate::ecs::{
    component::{Component, Table},
    entity::{Entity, Id},
};

/// A shared view of one entity's components.
///
/// Obtained from [`World::entity`](crate::ecs::World::entity), which only hands out views of live
/// entities.
#[derive(Clone, Copy)]
pub struct Ref<'w> {
    entity: Entity,
    components: &'w Table,
}

impl<'w> Ref<'w> {
    #[inline]
    pub(crate) fn new(entity: Entity, components: &'w Table) -> Self {
        Self { entity, components }
    }

    /// The entity this view refers to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The id of the entity this view refers to.
    #[inline]
    pub fn id(&self) -> Id {
        self.entity.id()
    }

    #[inline]
    pub fn get<C: Component>(&self) -> Option<&'w C> {
        self.components.get::<C>(self.id())
    }

    #[inline]
    pub fn contains<C: Component>(&self) -> bool {
        self.components.contains::<C>(self.id())
    }
}

/// An exclusive view of one entity's components.
///
/// Obtained from [`World::entity_mut`](crate::ecs::World::entity_mut).
pub struct RefMut<'w> {
    entity: Entity,
    components: &'w mut Table,
}

impl<'w> RefMut<'w> {
    #[inline]
    pub(crate) fn new(entity: Entity, components: &'w mut Table) -> Self {
        Self { entity, components }
    }

    /// The entity this view refers to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The id of the entity this view refers to.
    #[inline]
    pub fn id(&self) -> Id {
        self.entity.id()
    }

    /// Attach `value` unless the entity already has a `C`. Returns the stored value.
    #[inline]
    pub fn add<C: Component>(&mut self, value: C) -> &mut C {
        self.components.add(self.entity.id(), value)
    }

    /// Attach a `C` built by `make` unless the entity already has one.
    #[inline]
    pub fn emplace<C: Component>(&mut self, make: impl FnOnce() -> C) -> &mut C {
        self.components.emplace(self.entity.id(), make)
    }

    /// Attach `value`, overwriting any existing `C`.
    #[inline]
    pub fn set<C: Component>(&mut self, value: C) -> &mut C {
        self.components.set(self.entity.id(), value)
    }

    #[inline]
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.components.get::<C>(self.id())
    }

    #[inline]
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>(self.entity.id())
    }

    /// Detach and return the entity's `C`, if any.
    #[inline]
    pub fn remove<C: Component>(&mut self) -> Option<C> {
        self.components.remove::<C>(self.entity.id())
    }

    #[inline]
    pub fn contains<C: Component>(&self) -> bool {
        self.components.contains::<C>(self.id())
    }

    /// Downgrade to a shared view.
    #[inline]
    pub fn as_readonly(&self) -> Ref<'_> {
        Ref::new(self.entity, self.components)
    }
}

#[cfg(test)]
mod tests {
    use sprig_macros::Component;

    use super::*;

    #[derive(Component, Debug, PartialEq)]
    struct Health(i32);

    #[derive(Component, Debug, PartialEq)]
    struct Name(&'static str);

    #[test]
    fn ref_mut_attaches_and_detaches() {
        // Given
        let mut table = Table::new();
        let entity = Entity::new(Id::new(4));
        let mut view = RefMut::new(entity, &mut table);

        // When
        view.add(Health(10));
        view.set(Name("crate"));
        view.get_mut::<Health>().unwrap().0 -= 3;

        // Then
        assert_eq!(view.get::<Health>(), Some(&Health(7)));
        assert!(view.contains::<Name>());
        assert_eq!(view.remove::<Name>(), Some(Name("crate")));
        assert!(!view.contains::<Name>());
        assert_eq!(view.as_readonly().get::<Health>(), Some(&Health(7)));
    }

    #[test]
    fn views_only_see_their_own_entity() {
        // Given
        let mut table = Table::new();
        RefMut::new(Entity::new(Id::new(1)), &mut table).add(Health(1));

        // When
        let other = Ref::new(Entity::new(Id::new(2)), &table);

        // Then
        assert!(other.get::<Health>().is_none());
        assert_eq!(other.id(), Id::new(2));
    }

    #[test]
    fn emplace_does_not_replace() {
        let mut table = Table::new();
        let mut view = RefMut::new(Entity::new(Id::new(0)), &mut table);

        view.add(Health(5));
        view.emplace(|| Health(9));

        assert_eq!(view.get::<Health>(), Some(&Health(5)));
    }
}
