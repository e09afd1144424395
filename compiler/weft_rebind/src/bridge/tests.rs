use pretty_assertions::assert_eq;
use weft_hierarchy::{ClassHierarchy, ClassHierarchyBuilder};
use weft_ir::{AccessFlags, InvokeKind};

use super::*;

const PUBLIC: AccessFlags = AccessFlags::PUBLIC;

fn request(holder: TypeId, target: MethodRef) -> BridgeRequest {
    let target_def = MethodDef::new(target, PUBLIC, MethodBody::None);
    BridgeRequest {
        holder,
        bridge: target_def.to_forwarding_method(holder, InvokeKind::Super),
        reason: BridgeReason::Visibility,
    }
}

fn program() -> ClassHierarchy {
    let mut builder = ClassHierarchyBuilder::new(ItemFactory::new());
    builder.class("p.A").public().finish();
    builder.class("p.B").public().finish();
    builder
        .class("p.T")
        .method("x", "()V", PUBLIC)
        .method("y", "()V", PUBLIC)
        .finish();
    builder.class("p.U").method("x", "()V", PUBLIC).finish();
    builder.class("lib.L").library().finish();
    builder.build()
}

#[test]
fn test_commit_order_is_independent_of_request_order() {
    let hierarchy = program();
    let factory = hierarchy.factory().clone();
    let a = factory.class_type("p.A");
    let b = factory.class_type("p.B");
    let t = factory.class_type("p.T");
    let requests = vec![
        request(b, factory.create_method(t, "y", "()V")),
        request(a, factory.create_method(t, "y", "()V")),
        request(b, factory.create_method(t, "x", "()V")),
        request(a, factory.create_method(t, "x", "()V")),
    ];

    let run = |order: Vec<BridgeRequest>| {
        let mut program = hierarchy.clone();
        let pending = BridgeRequests::new();
        for r in order {
            pending.request(r);
        }
        pending.commit(&mut program, &factory)
    };
    let forward = run(requests.clone());
    let backward = run(requests.into_iter().rev().collect());

    let expected = vec![
        factory.create_method(a, "x", "()V"),
        factory.create_method(a, "y", "()V"),
        factory.create_method(b, "x", "()V"),
        factory.create_method(b, "y", "()V"),
    ];
    assert_eq!(forward, Ok(expected.clone()));
    assert_eq!(backward, Ok(expected));
}

#[test]
fn test_identical_requests_collapse() {
    let mut hierarchy = program();
    let factory = hierarchy.factory().clone();
    let a = factory.class_type("p.A");
    let t_x = factory.create_method(factory.class_type("p.T"), "x", "()V");

    let pending = BridgeRequests::new();
    pending.request(request(a, t_x));
    pending.request(request(a, t_x));
    let committed = pending.commit(&mut hierarchy, &factory);

    assert_eq!(committed, Ok(vec![t_x.with_holder(a)]));
    let bridge = hierarchy
        .definition_for(a)
        .and_then(|class| class.lookup_method(&t_x));
    assert!(bridge.is_some_and(|m| m.flags.contains(AccessFlags::BRIDGE | AccessFlags::SYNTHETIC)));
}

#[test]
fn test_conflicting_targets_fail() {
    let mut hierarchy = program();
    let factory = hierarchy.factory().clone();
    let a = factory.class_type("p.A");
    let t_x = factory.create_method(factory.class_type("p.T"), "x", "()V");
    let u_x = factory.create_method(factory.class_type("p.U"), "x", "()V");

    let pending = BridgeRequests::new();
    pending.request(request(a, u_x));
    pending.request(request(a, t_x));
    let result = pending.commit(&mut hierarchy, &factory);

    assert_eq!(
        result,
        Err(RebindingError::ConflictingBridge {
            bridge: "p.A.x()V".into(),
            first: "p.T.x()V".into(),
            second: "p.U.x()V".into(),
        })
    );
}

#[test]
fn test_commit_into_library_class_fails() {
    let mut hierarchy = program();
    let factory = hierarchy.factory().clone();
    let lib = factory.class_type("lib.L");
    let t_x = factory.create_method(factory.class_type("p.T"), "x", "()V");

    let pending = BridgeRequests::new();
    pending.request(request(lib, t_x));
    let result = pending.commit(&mut hierarchy, &factory);
    assert!(matches!(result, Err(RebindingError::BridgeCommitFailed { .. })));
}

#[test]
fn test_interface_bridge_holder() {
    let mut builder = ClassHierarchyBuilder::new(ItemFactory::new());
    let i = builder.interface("p.I").method("f", "()V", PUBLIC).finish();
    let j = builder.interface("p.J").implements("p.I").finish();
    let d = builder.class("p.D").implements("p.I").finish();
    let c = builder.class("p.C").extends("p.D").finish();
    let e = builder.class("p.E").extends("p.C").finish();
    let hierarchy = builder.build();
    let def = |ty| hierarchy.definition_for(ty).cloned();

    let Some(e_def) = def(e) else { panic!("p.E missing") };
    assert_eq!(find_holder_for_interface_bridge(&hierarchy, &e_def, i), d);
    let Some(j_def) = def(j) else { panic!("p.J missing") };
    assert_eq!(find_holder_for_interface_bridge(&hierarchy, &j_def, i), j);
    let Some(c_def) = def(c) else { panic!("p.C missing") };
    assert_eq!(find_holder_for_interface_bridge(&hierarchy, &c_def, i), d);
}

#[test]
fn test_visibility_bridge_holder() {
    let mut builder = ClassHierarchyBuilder::new(ItemFactory::new());
    let x = builder.class("p.X").method("foo", "()V", PUBLIC).finish();
    let y = builder.class("p.Y").public().extends("p.X").finish();
    let z = builder.class("p.Z").public().extends("p.Y").finish();
    let hidden = builder.class("p.Hidden").extends("p.X").finish();
    let hierarchy = builder.build();
    let def = |ty| hierarchy.definition_for(ty).cloned();

    let Some(z_def) = def(z) else { panic!("p.Z missing") };
    assert_eq!(find_holder_for_visibility_bridge(&hierarchy, &z_def, x, None), Some(y));

    // A package-private caller class is only visible within its package.
    let Some(hidden_def) = def(hidden) else { panic!("p.Hidden missing") };
    assert_eq!(find_holder_for_visibility_bridge(&hierarchy, &hidden_def, x, None), None);
    assert_eq!(
        find_holder_for_visibility_bridge(&hierarchy, &hidden_def, x, Some("p")),
        Some(hidden)
    );

    let Some(x_def) = def(x) else { panic!("p.X missing") };
    assert_eq!(find_holder_for_visibility_bridge(&hierarchy, &x_def, x, None), None);
}
