/// Invoke `$m` for a list of type idents and then for every shorter suffix of that list.
#[macro_export]
#[doc(hidden)]
macro_rules! for_each_tuple {
    ($m:ident !! $head:ident) => {
        $m!($head);
    };
    ($m:ident !! $head:ident, $($tail:ident),*) => {
        $m!($head, $($tail),*);
        $crate::for_each_tuple!($m !! $($tail),*);
    };
}

/// Implement a tuple macro for every arity from 1 to 12.
///
/// Joins, event sets and system sets are declared as tuples; twelve elements is plenty for a
/// single query or configurator call.
#[macro_export]
#[doc(hidden)]
macro_rules! all_tuples {
    ($m:ident) => {
        $crate::for_each_tuple!($m !! A, B, C, D, E, F, G, H, I, J, K, L);
    };
}
