use std::sync::Arc;

use nova_rebase::{
    same_method, CallShape, MethodToken, RebaseImplementationTarget, Resolution,
    SimpleMethodGraph, Size, SpecialMethodInvocation, TypeName, ACONST_NULL, INVOKESPECIAL,
};
use pretty_assertions::assert_eq;

use crate::harness::{
    graph_with, instrumented_type, target, token, FakeMethod, Insn, RecordingRebaseResolver,
    RecordingVisitor, DESCRIPTOR, INSTRUMENTED, NAME, RENAMED, SUPER,
};

fn apply(invocation: &SpecialMethodInvocation) -> (Vec<Insn>, Size) {
    let mut visitor = RecordingVisitor::default();
    let size = invocation.apply(&mut visitor);
    (visitor.insns, size)
}

#[test]
fn unresolved_token_is_not_invokable() {
    let rebase = Arc::new(RecordingRebaseResolver::new());
    let target = target(SimpleMethodGraph::new(), &rebase);

    let invocation = target.invoke_super(&token());

    assert!(!invocation.is_valid());
    assert!(invocation.method().is_none());
    assert!(invocation.owner().is_none());
    assert!(rebase.calls().is_empty());
}

#[test]
fn preserved_method_is_invokable() {
    let declared = FakeMethod::new(INSTRUMENTED, NAME, DESCRIPTOR)
        .specializable_for(INSTRUMENTED)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::answering(Resolution::Preserved(
        declared.clone(),
    )));
    let target = target(graph_with(declared.clone()), &rebase);

    let invocation = target.invoke_super(&token());

    assert_eq!(rebase.calls(), vec![token()]);
    let valid = invocation.as_valid().expect("preserved method should be invokable");
    assert!(same_method(valid.method().as_ref(), declared.as_ref()));
    assert_eq!(valid.owner(), &TypeName::new(INSTRUMENTED));
    assert_eq!(valid.shape(), CallShape::Special);

    let (insns, size) = apply(&invocation);
    assert_eq!(
        insns,
        vec![Insn::method(INVOKESPECIAL, INSTRUMENTED, NAME, DESCRIPTOR, false)]
    );
    assert_eq!(size, Size::new(0, 0));
}

#[test]
fn rebased_method_is_invokable() {
    let declared = FakeMethod::new(INSTRUMENTED, NAME, DESCRIPTOR).into_ref();
    let renamed = FakeMethod::new(INSTRUMENTED, RENAMED, DESCRIPTOR)
        .specializable_for(INSTRUMENTED)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::answering(
        Resolution::RebasedMethod(renamed.clone()),
    ));
    let target = target(graph_with(declared), &rebase);

    let invocation = target.invoke_super(&token());

    assert_eq!(rebase.calls(), vec![token()]);
    let valid = invocation.as_valid().expect("rebased method should be invokable");
    assert!(same_method(valid.method().as_ref(), renamed.as_ref()));
    assert_eq!(valid.owner(), &TypeName::new(INSTRUMENTED));

    let (insns, size) = apply(&invocation);
    assert_eq!(
        insns,
        vec![Insn::method(INVOKESPECIAL, INSTRUMENTED, RENAMED, DESCRIPTOR, false)]
    );
    assert_eq!(size, Size::new(0, 0));
}

#[test]
fn rebased_constructor_is_invokable_with_marker() {
    let declared = FakeMethod::new(INSTRUMENTED, NAME, DESCRIPTOR).into_ref();
    let converted = FakeMethod::new(INSTRUMENTED, RENAMED, DESCRIPTOR)
        .specializable_for(INSTRUMENTED)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::answering(
        Resolution::RebasedConstructor(converted.clone()),
    ));
    let target = target(graph_with(declared), &rebase);

    let invocation = target.invoke_super(&token());

    assert_eq!(rebase.calls(), vec![token()]);
    let valid = invocation.as_valid().expect("rebased constructor should be invokable");
    assert!(same_method(valid.method().as_ref(), converted.as_ref()));
    assert_eq!(valid.owner(), &TypeName::new(INSTRUMENTED));
    assert_eq!(valid.shape(), CallShape::WithMarker);

    let (insns, size) = apply(&invocation);
    assert_eq!(
        insns,
        vec![
            Insn::Simple(ACONST_NULL),
            Insn::method(INVOKESPECIAL, INSTRUMENTED, RENAMED, DESCRIPTOR, false),
        ]
    );
    assert_eq!(size, Size::new(1, 1));
}

#[test]
fn non_specializable_rebase_target_is_not_invokable() {
    let declared = FakeMethod::new(INSTRUMENTED, NAME, DESCRIPTOR).into_ref();
    let renamed = FakeMethod::new(INSTRUMENTED, RENAMED, DESCRIPTOR).into_ref();

    for resolution in [
        Resolution::Preserved(declared.clone()),
        Resolution::RebasedMethod(renamed.clone()),
        Resolution::RebasedConstructor(renamed.clone()),
    ] {
        let rebase = Arc::new(RecordingRebaseResolver::answering(resolution));
        let target = target(graph_with(declared.clone()), &rebase);
        assert!(!target.invoke_super(&token()).is_valid());
        assert_eq!(rebase.calls().len(), 1);
    }
}

#[test]
fn preserved_method_only_specializable_for_super_type_stays_invalid() {
    let declared = FakeMethod::new(INSTRUMENTED, NAME, DESCRIPTOR)
        .specializable_for(SUPER)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::answering(Resolution::Preserved(
        declared.clone(),
    )));
    let target = target(graph_with(declared), &rebase);

    assert!(!target.invoke_super(&token()).is_valid());
}

#[test]
fn super_type_method_is_invokable() {
    let inherited = FakeMethod::new("p/Root", NAME, DESCRIPTOR)
        .specializable_for(SUPER)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::new());
    let target = target(graph_with(inherited.clone()), &rebase);

    let invocation = target.invoke_super(&token());

    assert!(rebase.calls().is_empty());
    let valid = invocation.as_valid().expect("super method should be invokable");
    assert!(same_method(valid.method().as_ref(), inherited.as_ref()));
    assert_eq!(valid.owner(), &TypeName::new(SUPER));

    let (insns, size) = apply(&invocation);
    assert_eq!(
        insns,
        vec![Insn::method(INVOKESPECIAL, SUPER, NAME, DESCRIPTOR, false)]
    );
    assert_eq!(size, Size::new(0, 0));
}

#[test]
fn non_specializable_super_type_method_is_not_invokable() {
    let inherited = FakeMethod::new(SUPER, NAME, DESCRIPTOR).into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::new());
    let target = target(graph_with(inherited), &rebase);

    assert!(!target.invoke_super(&token()).is_valid());
    assert!(rebase.calls().is_empty());
}

#[test]
fn inherited_method_without_super_class_is_not_invokable() {
    let inherited = FakeMethod::new(SUPER, NAME, DESCRIPTOR)
        .specializable_for(SUPER)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::new());
    let target = RebaseImplementationTarget::new(
        nova_rebase::InstrumentedType::new(TypeName::new(INSTRUMENTED), None),
        Arc::new(graph_with(inherited)),
        rebase.clone(),
    );

    assert!(!target.invoke_super(&token()).is_valid());
    assert!(rebase.calls().is_empty());
}

#[test]
fn call_size_accounts_for_arguments_and_return_value() {
    let inherited = FakeMethod::new(SUPER, "sum", "(JI)D")
        .specializable_for(SUPER)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::new());
    let target = target(graph_with(inherited), &rebase);

    let invocation = target.invoke_super(&MethodToken::parse("sum", "(JI)D").unwrap());
    let (_, size) = apply(&invocation);
    assert_eq!(size, Size::new(-1, 0));
}

#[test]
fn origin_type_is_the_instrumented_type() {
    let rebase = Arc::new(RecordingRebaseResolver::new());
    let target = target(SimpleMethodGraph::new(), &rebase);

    assert_eq!(target.origin_type(), instrumented_type().name());
    target.invoke_super(&token());
    assert_eq!(target.origin_type(), &TypeName::new(INSTRUMENTED));
}

#[test]
fn resolution_is_idempotent() {
    let declared = FakeMethod::new(INSTRUMENTED, NAME, DESCRIPTOR).into_ref();
    let renamed = FakeMethod::new(INSTRUMENTED, RENAMED, DESCRIPTOR)
        .specializable_for(INSTRUMENTED)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::answering(
        Resolution::RebasedMethod(renamed),
    ));
    let target = target(graph_with(declared), &rebase);

    let first = target.invoke_super(&token());
    let second = target.invoke_super(&token());
    assert!(first.is_valid());
    assert_eq!(first, second);
    assert_eq!(rebase.calls().len(), 2);
}

#[test]
#[should_panic(expected = "invalid special method invocation")]
fn applying_invalid_invocation_panics() {
    let rebase = Arc::new(RecordingRebaseResolver::new());
    let target = target(SimpleMethodGraph::new(), &rebase);

    let mut visitor = RecordingVisitor::default();
    target.invoke_super(&token()).apply(&mut visitor);
}

#[test]
fn method_description_is_read_through_the_handle() {
    let inherited = FakeMethod::new(SUPER, NAME, DESCRIPTOR)
        .specializable_for(SUPER)
        .into_ref();
    let rebase = Arc::new(RecordingRebaseResolver::new());
    let target = target(graph_with(inherited), &rebase);

    let invocation = target.invoke_super(&token());
    let method = invocation.method().expect("valid invocation");
    assert_eq!(method.token(), token());
    assert_eq!(method.declaring_type(), &TypeName::new(SUPER));
}
