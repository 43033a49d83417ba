//! Diagnostics: cycle and evaluation error reporting.
//!
//! Requests never format user-facing text themselves. They hand the engine a
//! static [`Diag`] template, a location and a list of arguments; the engine
//! substitutes `{0}`, `{1}`, … and collects the result.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::base::{Position, Span};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Remark,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Remark => "remark",
        })
    }
}

/// A static diagnostic template whose arguments have type `Args`.
///
/// `Args` is usually a request's input tuple, which statically ties a cycle
/// template to the request kind that substitutes into it.
pub struct Diag<Args> {
    /// Stable identifier, e.g. `"circular_reference"`.
    pub id: &'static str,
    pub severity: Severity,
    /// Message text with `{N}` placeholders.
    pub format: &'static str,
    args: PhantomData<fn(&Args)>,
}

impl<Args> Diag<Args> {
    pub const fn new(id: &'static str, severity: Severity, format: &'static str) -> Self {
        Self {
            id,
            severity,
            format,
            args: PhantomData,
        }
    }

    pub const fn error(id: &'static str, format: &'static str) -> Self {
        Self::new(id, Severity::Error, format)
    }

    pub const fn warning(id: &'static str, format: &'static str) -> Self {
        Self::new(id, Severity::Warning, format)
    }

    pub const fn note(id: &'static str, format: &'static str) -> Self {
        Self::new(id, Severity::Note, format)
    }
}

impl<Args> Clone for Diag<Args> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Args> Copy for Diag<Args> {}

impl<Args> fmt::Debug for Diag<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diag")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("format", &self.format)
            .finish()
    }
}

/// A single substituted diagnostic argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticArgument {
    Signed(i64),
    Unsigned(u64),
    Bool(bool),
    Text(Arc<str>),
}

impl fmt::Display for DiagnosticArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticArgument::Signed(value) => write!(f, "{value}"),
            DiagnosticArgument::Unsigned(value) => write!(f, "{value}"),
            DiagnosticArgument::Bool(value) => write!(f, "{value}"),
            DiagnosticArgument::Text(text) => f.write_str(text),
        }
    }
}

/// Conversion of one value into a diagnostic argument.
pub trait ToDiagnosticArgument {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument;
}

macro_rules! signed_argument {
    ($($ty:ty),*) => {
        $(
            impl ToDiagnosticArgument for $ty {
                fn to_diagnostic_argument(&self) -> DiagnosticArgument {
                    DiagnosticArgument::Signed(*self as i64)
                }
            }
        )*
    };
}

macro_rules! unsigned_argument {
    ($($ty:ty),*) => {
        $(
            impl ToDiagnosticArgument for $ty {
                fn to_diagnostic_argument(&self) -> DiagnosticArgument {
                    DiagnosticArgument::Unsigned(*self as u64)
                }
            }
        )*
    };
}

macro_rules! text_argument {
    ($($ty:ty),*) => {
        $(
            impl ToDiagnosticArgument for $ty {
                fn to_diagnostic_argument(&self) -> DiagnosticArgument {
                    DiagnosticArgument::Text(Arc::from(self.to_string()))
                }
            }
        )*
    };
}

signed_argument!(i8, i16, i32, i64, isize);
unsigned_argument!(u8, u16, u32, u64, usize);
// Wider than the numeric variants.
text_argument!(i128, u128, f32, f64);

impl ToDiagnosticArgument for bool {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        DiagnosticArgument::Bool(*self)
    }
}

impl ToDiagnosticArgument for char {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        DiagnosticArgument::Text(Arc::from(self.to_string()))
    }
}

impl ToDiagnosticArgument for str {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        DiagnosticArgument::Text(Arc::from(self))
    }
}

impl ToDiagnosticArgument for String {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        self.as_str().to_diagnostic_argument()
    }
}

impl<T: ToDiagnosticArgument + ?Sized> ToDiagnosticArgument for Box<T> {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        (**self).to_diagnostic_argument()
    }
}

impl<T: ToDiagnosticArgument + ?Sized> ToDiagnosticArgument for Arc<T> {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        (**self).to_diagnostic_argument()
    }
}

impl<T: ToDiagnosticArgument> ToDiagnosticArgument for Option<T> {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        match self {
            Some(value) => value.to_diagnostic_argument(),
            None => DiagnosticArgument::Text(Arc::from("none")),
        }
    }
}

impl<T: ToDiagnosticArgument> ToDiagnosticArgument for [T] {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        let items: Vec<String> = self
            .iter()
            .map(|item| item.to_diagnostic_argument().to_string())
            .collect();
        DiagnosticArgument::Text(Arc::from(format!("{{{}}}", items.join(", "))))
    }
}

impl<T: ToDiagnosticArgument> ToDiagnosticArgument for Vec<T> {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        self.as_slice().to_diagnostic_argument()
    }
}

impl ToDiagnosticArgument for () {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        DiagnosticArgument::Text(Arc::from("()"))
    }
}

impl ToDiagnosticArgument for Position {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        DiagnosticArgument::Text(Arc::from(self.to_string()))
    }
}

impl ToDiagnosticArgument for Span {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        DiagnosticArgument::Text(Arc::from(self.to_string()))
    }
}

impl<T: ToDiagnosticArgument + ?Sized> ToDiagnosticArgument for &T {
    fn to_diagnostic_argument(&self) -> DiagnosticArgument {
        (**self).to_diagnostic_argument()
    }
}

/// Conversion of an argument tuple into the argument list of a [`Diag`].
pub trait DiagnosticArgs {
    fn diagnostic_args(&self) -> Vec<DiagnosticArgument>;
}

impl DiagnosticArgs for () {
    fn diagnostic_args(&self) -> Vec<DiagnosticArgument> {
        Vec::new()
    }
}

macro_rules! diagnostic_args_tuple {
    ($($name:ident),+) => {
        impl<$($name: ToDiagnosticArgument),+> DiagnosticArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn diagnostic_args(&self) -> Vec<DiagnosticArgument> {
                let ($($name,)+) = self;
                vec![$($name.to_diagnostic_argument()),+]
            }
        }
    };
}

diagnostic_args_tuple!(A);
diagnostic_args_tuple!(A, B);
diagnostic_args_tuple!(A, B, C);
diagnostic_args_tuple!(A, B, C, D);
diagnostic_args_tuple!(A, B, C, D, E);
diagnostic_args_tuple!(A, B, C, D, E, F);

/// A rendered diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Template id (e.g. "circular_reference"), if produced from a template.
    pub code: Option<&'static str>,
    pub severity: Severity,
    /// Where the diagnostic points, if anywhere.
    pub span: Option<Span>,
    /// The rendered message.
    pub message: Arc<str>,
    /// The arguments substituted into the message.
    pub arguments: Vec<DiagnosticArgument>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self::with_severity(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self::with_severity(Severity::Warning, message)
    }

    /// Create a new note.
    pub fn note(message: impl Into<Arc<str>>) -> Self {
        Self::with_severity(Severity::Note, message)
    }

    fn with_severity(severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            code: None,
            severity,
            span: None,
            message: message.into(),
            arguments: Vec::new(),
        }
    }

    /// Render a template.
    pub fn from_template<Args>(
        span: Option<Span>,
        diag: Diag<Args>,
        arguments: Vec<DiagnosticArgument>,
    ) -> Self {
        Self {
            code: Some(diag.id),
            severity: diag.severity,
            span,
            message: Arc::from(render(diag.format, &arguments)),
            arguments,
        }
    }

    /// Attach a location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span {
            write!(f, "{span}: ")?;
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Substitute `{N}` placeholders. Placeholders without a matching argument
/// are left untouched.
pub fn render(format: &str, arguments: &[DiagnosticArgument]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let argument = after[..digits]
            .parse::<usize>()
            .ok()
            .filter(|_| after[digits..].starts_with('}'))
            .and_then(|index| arguments.get(index));
        match argument {
            Some(argument) => {
                out.push_str(&argument.to_string());
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// DIAGNOSTIC ENGINE
// ============================================================================

/// Collects diagnostics emitted during evaluation.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEngine {
    /// Create a new empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a templated diagnostic.
    pub fn diagnose<Args: DiagnosticArgs>(
        &mut self,
        span: Option<Span>,
        diag: Diag<Args>,
        args: &Args,
    ) {
        self.emit(Diagnostic::from_template(span, diag, args.diagnostic_args()));
    }

    /// Emit an already rendered diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(
            severity = %diagnostic.severity,
            code = diagnostic.code.unwrap_or(""),
            "{}",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }

    /// Get all diagnostics, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take all diagnostics, leaving the engine empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Get the error count.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Get the note count.
    pub fn note_count(&self) -> usize {
        self.count(Severity::Note)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
