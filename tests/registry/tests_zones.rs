//! Identities and names from declared zones.

use polar_request::typeid::BuiltinTypeIds;
use polar_request::{TypeIdentity, Zone, identity_of, name_of};
use rstest::rstest;

use crate::helpers::kinds::{CountingSquare, CycleA, Fibonacci, TestTypeIds};

#[test]
fn test_test_kinds_live_in_unit_tests_zone() {
    assert_eq!(TestTypeIds::ZONE, Zone::UnitTests);
    assert_eq!(identity_of::<Fibonacci>().zone(), Zone::UnitTests);
    assert_eq!(identity_of::<Fibonacci>().local_id(), 1);
    assert_eq!(identity_of::<CountingSquare>().local_id(), 2);
}

#[test]
fn test_local_ids_follow_declaration_order() {
    for (offset, (local_id, _)) in TestTypeIds::ENTRIES.iter().enumerate() {
        assert_eq!(usize::from(*local_id), usize::from(TestTypeIds::BASE) + offset);
    }
    assert_eq!(TestTypeIds::ENTRIES.len(), TestTypeIds::COUNT);
}

#[test]
fn test_identities_are_distinct_across_zones() {
    // Same local id, different zones.
    assert_eq!(identity_of::<Fibonacci>().local_id(), identity_of::<u8>().local_id());
    assert_ne!(identity_of::<Fibonacci>(), identity_of::<u8>());
    assert_ne!(identity_of::<Fibonacci>().value(), identity_of::<u8>().value());
}

#[test]
fn test_entry_identity_matches_kind_identity() {
    assert_eq!(TestTypeIds::CycleA.identity(), identity_of::<CycleA>());
    assert_eq!(
        identity_of::<CycleA>(),
        TypeIdentity::new(Zone::UnitTests, TestTypeIds::CycleA as u8)
    );
}

#[rstest]
#[case(name_of::<Fibonacci>(), "Fibonacci")]
#[case(name_of::<u32>(), "UInt32")]
#[case(name_of::<String>(), "String")]
#[case(name_of::<Vec<Fibonacci>>(), "Vector<Fibonacci>")]
#[case(name_of::<Option<Vec<i64>>>(), "Optional<Vector<Int64>>")]
fn test_declared_names(#[case] name: std::borrow::Cow<'static, str>, #[case] expected: &str) {
    assert_eq!(name, expected);
}

#[test]
fn test_template_identity_depends_on_argument() {
    let of_fib = identity_of::<Vec<Fibonacci>>();
    let of_square = identity_of::<Vec<CountingSquare>>();

    assert_eq!(of_fib.zone(), Zone::Builtin);
    assert_eq!(of_fib.local_id(), BuiltinTypeIds::Vector as u8);
    assert_ne!(of_fib, of_square);
    assert_eq!(of_fib.argument_value(), Some(identity_of::<Fibonacci>().value()));
}

#[test]
fn test_zone_ids() {
    assert_eq!(Zone::Builtin.id(), 0);
    assert_eq!(Zone::UnitTests.id(), 255);
    assert_eq!(Zone::Ast.name(), "AST");
}
