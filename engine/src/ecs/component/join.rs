use crate::{
    all_tuples,
    ecs::{
        component::{Component, Table},
        entity,
        storage::{Bounds, PagedStore},
    },
};

/// A set of component types that can be joined over a [`Table`].
///
/// Implemented for a single component type and for tuples of up to 12 component types. Both
/// forms visit entities in ascending id order.
///
/// The shared join scans the union of every requested store's id range and checks each type in
/// declared order, skipping an id at the first type it lacks:
///
/// ```text
/// A:        200 201
/// B:            201 202
/// scan:     200 201 202
///            ✗   ✓   ✗      → (201, (&A, &B))
/// ```
///
/// The mutable join merges the stores' ascending iterators instead, so each store is borrowed
/// exactly once. Naming the same type twice in a mutable join yields no rows.
pub trait Join {
    /// Shared references to each component.
    type Item<'a>;

    /// Exclusive references to each component.
    type ItemMut<'a>;

    /// Call `f` for every entity holding every component.
    fn join<'a>(table: &'a Table, f: impl FnMut(entity::Id, Self::Item<'a>));

    /// Call `f` with exclusive access for every entity holding every component.
    fn join_mut<'a>(table: &'a mut Table, f: impl FnMut(entity::Id, Self::ItemMut<'a>));
}

impl<C: Component> Join for C {
    type Item<'a> = &'a C;
    type ItemMut<'a> = &'a mut C;

    fn join<'a>(table: &'a Table, mut f: impl FnMut(entity::Id, Self::Item<'a>)) {
        let Some(store) = table.store::<C>() else {
            return;
        };
        for (id, value) in store.iter() {
            f(id, value);
        }
    }

    fn join_mut<'a>(table: &'a mut Table, mut f: impl FnMut(entity::Id, Self::ItemMut<'a>)) {
        let Some(store) = table.store_mut::<C>() else {
            return;
        };
        for (id, value) in store.iter_mut() {
            f(id, value);
        }
    }
}

/// Implement Join for tuples of component types.
macro_rules! tuple_join {
    ($($name: ident),*) => {
        impl<$($name: Component),*> Join for ($($name,)*) {
            type Item<'a> = ($(&'a $name,)*);
            type ItemMut<'a> = ($(&'a mut $name,)*);

            #[allow(non_snake_case)]
            fn join<'a>(table: &'a Table, mut f: impl FnMut(entity::Id, Self::Item<'a>)) {
                // A type with no store can match nothing.
                let ($($name,)*) = match ($(table.store::<$name>(),)*) {
                    ($(Some($name),)*) => ($($name,)*),
                    _ => return,
                };

                let bounds = Bounds::EMPTY $(.union($name.index_range()))*;
                for id in bounds.ids() {
                    $(let Some($name) = $name.get(id) else { continue; };)*
                    f(id, ($($name,)*));
                }
            }

            #[allow(non_snake_case)]
            fn join_mut<'a>(table: &'a mut Table, mut f: impl FnMut(entity::Id, Self::ItemMut<'a>)) {
                let ($(Some($name),)*) = ($(table.index_of::<$name>(),)*) else {
                    return;
                };
                let Some([$($name,)*]) = table.stores_disjoint_mut([$($name,)*]) else {
                    return;
                };
                $(
                    let Some($name) = $name
                        .and_then(|store| store.as_any_mut().downcast_mut::<PagedStore<$name>>())
                    else {
                        return;
                    };
                    let mut $name = $name.iter_mut().peekable();
                )*

                'rows: loop {
                    // The highest head id is the first candidate every store could share.
                    let mut target = entity::Id::new(0);
                    $(
                        match $name.peek() {
                            Some((id, _)) => target = target.max(*id),
                            None => break 'rows,
                        }
                    )*

                    // Advance every store to the candidate.
                    let mut aligned = true;
                    $(
                        while $name.next_if(|(id, _)| *id < target).is_some() {}
                        match $name.peek() {
                            Some((id, _)) => aligned &= *id == target,
                            None => break 'rows,
                        }
                    )*

                    if aligned {
                        $(let Some((_, $name)) = $name.next() else { break 'rows; };)*
                        f(target, ($($name,)*));
                    }
                }
            }
        }
    }
}

all_tuples!(tuple_join);
