//! Zone declaration macro.

/// Declare a type identity zone.
///
/// Generates a `#[repr(u8)]` enum whose variants are the declared names in
/// order (so each discriminant is the entry's local id) and an
/// `unsafe impl ZonedType` for every listed type and template.
///
/// ```
/// use polar_request::{Zone, identity_of, name_of};
///
/// pub struct Fibonacci;
/// pub struct Wrapper<T>(T);
///
/// polar_request::type_id_zone! {
///     pub unsafe zone UnitTests as TestTypeIds, base 1;
///     types {
///         Fibonacci => Fibonacci,
///     }
///     templates {
///         Wrapper<T> => Wrapper,
///     }
/// }
///
/// assert_eq!(identity_of::<Fibonacci>().zone(), Zone::UnitTests);
/// assert_eq!(identity_of::<Fibonacci>().local_id(), 1);
/// assert_eq!(TestTypeIds::COUNT, 2);
/// assert_eq!(name_of::<Wrapper<Fibonacci>>(), "Wrapper<Fibonacci>");
/// ```
///
/// # Safety
///
/// The `unsafe` in `unsafe zone` is the caller's promise that this is the only
/// declaration of the zone in the final binary. Two declarations of one zone
/// hand out the same identities twice, and erased requests and memo tables
/// would then reinterpret one type as another. `Builtin` is declared by this
/// crate; `UnitTests` belongs to test binaries.
///
/// A declaration without it does not build:
///
/// ```compile_fail
/// pub struct Lookup;
///
/// polar_request::type_id_zone! {
///     pub zone NameLookup as LookupIds, base 1;
///     types { Lookup => Lookup }
/// }
/// ```
///
/// Also rejected at compile time:
///
/// - a base of 0 (the hidden `__ZoneBase` discriminant underflows)
///
/// ```compile_fail
/// pub struct Lookup;
///
/// polar_request::type_id_zone! {
///     pub unsafe zone NameLookup as LookupIds, base 0;
///     types { Lookup => Lookup }
/// }
/// ```
///
/// - a name listed twice in the zone (duplicate variant)
///
/// ```compile_fail
/// pub struct First;
/// pub struct Second;
///
/// polar_request::type_id_zone! {
///     pub unsafe zone NameLookup as LookupIds, base 1;
///     types { First => Same, Second => Same }
/// }
/// ```
///
/// - a type listed twice anywhere (conflicting `ZonedType` impls)
///
/// ```compile_fail
/// pub struct Lookup;
///
/// polar_request::type_id_zone! {
///     pub unsafe zone NameLookup as LookupIds, base 1;
///     types { Lookup => First, Lookup => Second }
/// }
/// ```
///
/// - template instances nested deeper than the packed value holds
///
/// ```compile_fail
/// use polar_request::identity_of;
///
/// let _ = const { identity_of::<Vec<Vec<Vec<Vec<u8>>>>>() };
/// ```
///
/// - more entries than fit in a `u8` local id (discriminant overflow)
#[macro_export]
macro_rules! type_id_zone {
    (
        $(#[$meta:meta])*
        $vis:vis unsafe zone $zone:ident as $ids:ident, base $base:literal;
        types { $( $ty:ty => $name:ident ),* $(,)? }
        $( templates { $( $tmpl:ident < $param:ident > => $tname:ident ),* $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $ids {
            #[doc(hidden)]
            __ZoneBase = $base - 1,
            $( $name, )*
            $( $( $tname, )* )?
            #[doc(hidden)]
            __ZoneEnd,
        }

        #[allow(dead_code)]
        impl $ids {
            /// The zone these ids belong to.
            pub const ZONE: $crate::typeid::Zone = $crate::typeid::Zone::$zone;

            /// Local id of the first entry.
            pub const BASE: u8 = $base;

            /// Number of entries, types and templates together.
            pub const COUNT: usize = ($ids::__ZoneEnd as usize) - ($base as usize);

            /// `(local id, name)` for every entry, in declaration order.
            pub const ENTRIES: &'static [(u8, &'static str)] = &[
                $( ($ids::$name as u8, stringify!($name)), )*
                $( $( ($ids::$tname as u8, stringify!($tname)), )* )?
            ];

            /// Registry identity of this entry. Template entries report the
            /// uninstantiated template.
            pub const fn identity(self) -> $crate::typeid::TypeIdentity {
                $crate::typeid::TypeIdentity::new(Self::ZONE, self as u8)
            }
        }

        $(
            unsafe impl $crate::typeid::ZonedType for $ty {
                const IDENTITY: $crate::typeid::TypeIdentity =
                    $crate::typeid::TypeIdentity::new($crate::typeid::Zone::$zone, $ids::$name as u8);

                fn name() -> ::std::borrow::Cow<'static, str> {
                    ::std::borrow::Cow::Borrowed(stringify!($name))
                }
            }
        )*

        $( $(
            unsafe impl<$param: $crate::typeid::ZonedType> $crate::typeid::ZonedType for $tmpl<$param> {
                const IDENTITY: $crate::typeid::TypeIdentity = $crate::typeid::TypeIdentity::template(
                    $crate::typeid::Zone::$zone,
                    $ids::$tname as u8,
                    <$param as $crate::typeid::ZonedType>::IDENTITY,
                );

                fn name() -> ::std::borrow::Cow<'static, str> {
                    ::std::borrow::Cow::Owned(format!(
                        "{}<{}>",
                        stringify!($tname),
                        <$param as $crate::typeid::ZonedType>::name()
                    ))
                }
            }
        )* )?
    };
}
