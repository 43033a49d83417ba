//! Type identity registry.
//!
//! Every type that takes part in the request system (request kinds, and the
//! primitive and container types requests are generic over) gets a stable
//! numeric identity and a display name at compile time. Identities are
//! partitioned into [`Zone`]s so that independently maintained lists never
//! collide.
//!
//! ## Declaring a zone
//!
//! Each zone is one [`type_id_zone!`](crate::type_id_zone) invocation. Local
//! ids are assigned by position, starting at the zone's base offset:
//!
//! ```text
//! type_id_zone! {
//!     pub unsafe zone NameLookup as NameLookupTypeIds, base 1;
//!     types {
//!         LookupQualified => LookupQualified,   // local id 1
//!         LookupUnqualified => LookupUnqualified, // local id 2
//!     }
//! }
//! ```
//!
//! New entries go at the end. Inserting or reordering changes the ids of
//! every following entry.
//!
//! ## Packed values
//!
//! ```text
//! plain type   : (zone << 8) | local_id
//! C<T>         : (value(T) << 16) | (zone << 8) | local_id(C)
//! ```
//!
//! Local ids are never 0, so the packing is injective. Nesting templates
//! deeper than 64 bits allow is rejected at compile time.

mod builtin;
mod zone;

use std::borrow::Cow;
use std::fmt;

pub use builtin::BuiltinTypeIds;

/// A compile-time namespace of type identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Zone {
    /// Primitive and container types.
    Builtin = 0,
    /// Syntax-tree level request kinds.
    Ast = 1,
    /// Name lookup request kinds.
    NameLookup = 2,
    /// Type checking request kinds.
    TypeChecker = 3,
    /// Test-only request kinds.
    UnitTests = 255,
}

impl Zone {
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Zone::Builtin => "Builtin",
            Zone::Ast => "AST",
            Zone::NameLookup => "NameLookup",
            Zone::TypeChecker => "TypeChecker",
            Zone::UnitTests => "UnitTests",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The identity of a registered type.
///
/// `zone` and `local_id` name the registry entry; `value` is the packed
/// identity that also encodes template arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    zone: Zone,
    local_id: u8,
    value: u64,
}

impl TypeIdentity {
    /// Identity of a plain registered type.
    pub const fn new(zone: Zone, local_id: u8) -> Self {
        assert!(local_id != 0, "local type ids start at 1");
        Self {
            zone,
            local_id,
            value: ((zone as u64) << 8) | local_id as u64,
        }
    }

    /// Identity of a single-parameter template instantiated with `argument`.
    pub const fn template(zone: Zone, local_id: u8, argument: TypeIdentity) -> Self {
        assert!(
            argument.value >> 48 == 0,
            "template arguments nest too deeply for a packed type identity"
        );
        let base = Self::new(zone, local_id);
        Self {
            value: (argument.value << 16) | base.value,
            ..base
        }
    }

    pub const fn zone(self) -> Zone {
        self.zone
    }

    pub const fn local_id(self) -> u8 {
        self.local_id
    }

    /// The packed identity value.
    pub const fn value(self) -> u64 {
        self.value
    }

    /// The template argument's packed value, for template instances.
    pub const fn argument_value(self) -> Option<u64> {
        match self.value >> 16 {
            0 => None,
            argument => Some(argument),
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({:#x})", self.zone, self.local_id, self.value)
    }
}

/// A type with a registry entry.
///
/// # Safety
///
/// `IDENTITY` must be unique to the implementing type within the final
/// binary: type-erased requests and the evaluator's memo tables convert back
/// to concrete types by comparing identities. Implement this trait only
/// through [`type_id_zone!`](crate::type_id_zone), whose `unsafe zone`
/// declaration carries the promise that each zone is declared once.
pub unsafe trait ZonedType: 'static {
    const IDENTITY: TypeIdentity;

    /// The display name declared in the zone list.
    fn name() -> Cow<'static, str>;
}

/// The identity of `T`. Fails to build if `T` has no registry entry.
pub const fn identity_of<T: ZonedType + ?Sized>() -> TypeIdentity {
    T::IDENTITY
}

/// The declared display name of `T`.
pub fn name_of<T: ZonedType + ?Sized>() -> Cow<'static, str> {
    T::name()
}
