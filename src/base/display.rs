//! Deterministic rendering for logs and diagnostics.
//!
//! `SimpleDisplay` is what a request uses to print its inputs. The output is
//! never compared or hashed, but it must be stable: two renderings of the same
//! value produce the same text.

use std::fmt::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use super::position::{Position, Span};

/// Render a value for logs, traces and diagnostics.
pub trait SimpleDisplay {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result;
}

/// Render a value into a fresh string.
pub fn display_to_string<T: SimpleDisplay + ?Sized>(value: &T) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = value.simple_display(&mut out);
    out
}

macro_rules! display_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SimpleDisplay for $ty {
                fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
                    write!(out, "{}", self)
                }
            }
        )*
    };
}

display_via_display!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, Position,
    Span,
);

impl SimpleDisplay for char {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        write!(out, "{:?}", self)
    }
}

impl SimpleDisplay for str {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        write!(out, "{:?}", self)
    }
}

impl SimpleDisplay for String {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        self.as_str().simple_display(out)
    }
}

impl<T: SimpleDisplay + ?Sized> SimpleDisplay for &T {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        (**self).simple_display(out)
    }
}

impl<T: SimpleDisplay + ?Sized> SimpleDisplay for Box<T> {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        (**self).simple_display(out)
    }
}

impl<T: SimpleDisplay + ?Sized> SimpleDisplay for Rc<T> {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        (**self).simple_display(out)
    }
}

impl<T: SimpleDisplay + ?Sized> SimpleDisplay for Arc<T> {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        (**self).simple_display(out)
    }
}

impl<T: SimpleDisplay> SimpleDisplay for Option<T> {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        match self {
            Some(value) => value.simple_display(out),
            None => out.write_str("none"),
        }
    }
}

impl<T: SimpleDisplay> SimpleDisplay for [T] {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        out.write_char('{')?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                out.write_str(", ")?;
            }
            value.simple_display(out)?;
        }
        out.write_char('}')
    }
}

impl<T: SimpleDisplay> SimpleDisplay for Vec<T> {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        self.as_slice().simple_display(out)
    }
}

impl SimpleDisplay for () {
    fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
        out.write_str("()")
    }
}

macro_rules! display_tuple {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: SimpleDisplay $(, $rest: SimpleDisplay)*> SimpleDisplay for ($first, $($rest,)*) {
            #[allow(non_snake_case)]
            fn simple_display(&self, out: &mut dyn Write) -> fmt::Result {
                let ($first, $($rest,)*) = self;
                out.write_char('(')?;
                $first.simple_display(out)?;
                $(
                    out.write_str(", ")?;
                    $rest.simple_display(out)?;
                )*
                out.write_char(')')
            }
        }
    };
}

display_tuple!(A);
display_tuple!(A, B);
display_tuple!(A, B, C);
display_tuple!(A, B, C, D);
display_tuple!(A, B, C, D, E);
display_tuple!(A, B, C, D, E, F);
