//! The `Builtin` zone: primitive and container types.
//!
//! Append only. Inserting or reordering entries changes the identity of every
//! type declared after the edit.

use std::sync::Arc;

crate::type_id_zone! {
    /// Local ids of the `Builtin` zone.
    pub unsafe zone Builtin as BuiltinTypeIds, base 1;
    types {
        u8 => UInt8,
        i8 => Int8,
        u16 => UInt16,
        i16 => Int16,
        u32 => UInt32,
        i32 => Int32,
        u64 => UInt64,
        i64 => Int64,
        u128 => UInt128,
        i128 => Int128,
        usize => UInt,
        isize => Int,
        f32 => Float,
        f64 => Double,
        bool => Bool,
        char => Char,
        () => Void,
        String => String,
        &'static str => StringRef,
    }
    templates {
        Vec<T> => Vector,
        Option<T> => Optional,
        Box<T> => Box,
        Arc<T> => Arc,
    }
}
