use super::*;

fn ty(raw: u32) -> TypeId {
    TypeId::from_descriptor(Name::from_raw(raw))
}

#[test]
fn test_method_equality_is_structural() {
    let a = MethodRef::new(ty(1), Name::from_raw(10), Name::from_raw(20));
    let b = MethodRef::new(ty(1), Name::from_raw(10), Name::from_raw(20));
    let c = MethodRef::new(ty(2), Name::from_raw(10), Name::from_raw(20));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.same_signature(&c));
}

#[test]
fn test_with_holder_keeps_signature() {
    let m = MethodRef::new(ty(1), Name::from_raw(10), Name::from_raw(20));
    let moved = m.with_holder(ty(5));
    assert_eq!(moved.holder, ty(5));
    assert_eq!(moved.name, m.name);
    assert_eq!(moved.descriptor, m.descriptor);

    let f = FieldRef::new(ty(1), Name::from_raw(11), ty(3));
    let moved = f.with_holder(ty(7));
    assert!(moved.same_signature(&f));
    assert_ne!(moved, f);
}
