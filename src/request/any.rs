//! Type-erased requests.
//!
//! The evaluator keeps requests of many kinds side by side (the active
//! stack, the dependency graph). `AnyRequest` erases the kind but keeps the
//! uniform surface: equality, hashing, display and the cycle hooks. Getting
//! the typed request back goes through the registry identity, never through
//! `std::any`.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::base::{HashCode, SimpleDisplay};
use crate::diagnostics::DiagnosticEngine;
use crate::typeid::{TypeIdentity, name_of};

use super::simple::{Request, RequestKey, RequestKind};

/// Object-safe view of a `Request<K>`. Only `Request<K>` implements it.
trait ErasedRequest {
    fn kind_identity(&self) -> TypeIdentity;
    fn kind_name(&self) -> Cow<'static, str>;
    fn hash_code(&self) -> HashCode;
    fn eq_erased(&self, other: &dyn ErasedRequest) -> bool;
    fn display_erased(&self, out: &mut dyn fmt::Write) -> fmt::Result;
    fn diagnose_cycle(&self, diags: &mut DiagnosticEngine);
    fn note_cycle_step(&self, diags: &mut DiagnosticEngine);
}

impl<K: RequestKind> ErasedRequest for Request<K> {
    fn kind_identity(&self) -> TypeIdentity {
        K::IDENTITY
    }

    fn kind_name(&self) -> Cow<'static, str> {
        name_of::<K>()
    }

    fn hash_code(&self) -> HashCode {
        Request::hash_code(self)
    }

    fn eq_erased(&self, other: &dyn ErasedRequest) -> bool {
        downcast::<K>(other).is_some_and(|other| self == other)
    }

    fn display_erased(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.simple_display(out)
    }

    fn diagnose_cycle(&self, diags: &mut DiagnosticEngine) {
        Request::diagnose_cycle(self, diags);
    }

    fn note_cycle_step(&self, diags: &mut DiagnosticEngine) {
        Request::note_cycle_step(self, diags);
    }
}

fn downcast<K: RequestKind>(erased: &dyn ErasedRequest) -> Option<&Request<K>> {
    if erased.kind_identity() != K::IDENTITY {
        return None;
    }
    // SAFETY: `Request<K>` is the only implementor of `ErasedRequest`, and
    // `ZonedType` identities are unique per type, so a matching identity
    // means `erased` points at a `Request<K>`.
    Some(unsafe { &*std::ptr::from_ref(erased).cast::<Request<K>>() })
}

/// A request of any kind. Cheap to clone.
#[derive(Clone)]
pub struct AnyRequest {
    storage: Rc<dyn ErasedRequest>,
}

impl AnyRequest {
    pub fn new<K: RequestKind>(request: Request<K>) -> Self {
        Self {
            storage: Rc::new(request),
        }
    }

    pub fn kind_identity(&self) -> TypeIdentity {
        self.storage.kind_identity()
    }

    pub fn kind_name(&self) -> Cow<'static, str> {
        self.storage.kind_name()
    }

    pub fn hash_code(&self) -> HashCode {
        self.storage.hash_code()
    }

    pub fn key(&self) -> RequestKey {
        RequestKey {
            kind: self.kind_identity(),
            hash: self.hash_code(),
        }
    }

    /// The typed request, if this is a request of kind `K`.
    pub fn downcast_ref<K: RequestKind>(&self) -> Option<&Request<K>> {
        downcast::<K>(self.storage.as_ref())
    }

    pub fn is<K: RequestKind>(&self) -> bool {
        self.kind_identity() == K::IDENTITY
    }

    pub fn diagnose_cycle(&self, diags: &mut DiagnosticEngine) {
        self.storage.diagnose_cycle(diags);
    }

    pub fn note_cycle_step(&self, diags: &mut DiagnosticEngine) {
        self.storage.note_cycle_step(diags);
    }
}

impl<K: RequestKind> From<Request<K>> for AnyRequest {
    fn from(request: Request<K>) -> Self {
        Self::new(request)
    }
}

impl PartialEq for AnyRequest {
    fn eq(&self, other: &Self) -> bool {
        self.storage.eq_erased(other.storage.as_ref())
    }
}

impl Eq for AnyRequest {}

impl Hash for AnyRequest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl SimpleDisplay for AnyRequest {
    fn simple_display(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.storage.display_erased(out)
    }
}

impl fmt::Display for AnyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.simple_display(f)
    }
}

impl fmt::Debug for AnyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.simple_display(f)
    }
}
