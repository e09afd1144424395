use pretty_assertions::assert_eq;

use super::RebindingOptions;

#[test]
fn test_defaults_target_class_files() {
    let options = RebindingOptions::default();
    assert_eq!(options.num_threads, 0);
    assert!(options.generating_class_files);
    assert!(!options.super_invoke_defect);
}

#[test]
fn test_setters_chain() {
    let options = RebindingOptions::single_threaded()
        .with_class_files(false)
        .with_super_invoke_defect(true);
    assert_eq!(options.num_threads, 1);
    assert!(!options.generating_class_files);
    assert!(options.super_invoke_defect);
    assert_eq!(RebindingOptions::default().with_threads(3).num_threads, 3);
}
