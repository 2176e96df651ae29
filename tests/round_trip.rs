use yamlite::parse;

/// Re-parsing the emitted YAML must yield the same structural shape and,
/// for these inputs, identical scalar content.
fn assert_shape_stable(input: &str) {
    let doc = parse(input).unwrap_or_else(|err| panic!("parse {input:?}: {err}"));
    let yaml = doc.as_yaml();
    let reparsed = parse(&yaml).unwrap_or_else(|err| panic!("re-parse {yaml:?}: {err}"));
    assert_eq!(
        doc.as_py_struct(false),
        reparsed.as_py_struct(false),
        "shape drifted through {input:?} -> {yaml:?}"
    );
}

#[test]
fn plain_structures() {
    assert_shape_stable("a: 1\n");
    assert_shape_stable("a: 1\nb: 2\nc: 3\n");
    assert_shape_stable("- one\n- two\n- three\n");
    assert_shape_stable("outer:\n  inner:\n    leaf: deep\n");
    assert_shape_stable("foo: 1\nbar:\n - 2\n -\n  - a\n  - b\n  - 14\njohn: doe\n");
}

#[test]
fn sequences_of_maps() {
    assert_shape_stable("- x: 1\n  y: 2\n- x: 3\n  y: 4\n");
    assert_shape_stable("matrix:\n  - - 1\n    - 2\n  - - 3\n    - 4\n");
}

#[test]
fn quoted_content() {
    assert_shape_stable("a: 'it''s quoted'\n");
    assert_shape_stable("a: \"with\\nnewline\"\n");
    assert_shape_stable("a: 'ends with space '\n");
    assert_shape_stable("a: '# not a comment'\n");
    assert_shape_stable("a: 'k: looks like a key'\n");
    assert_shape_stable("a: \"tab\\there\"\n");
}

#[test]
fn block_scalars() {
    assert_shape_stable("a: |\n  line one\n  line two\n");
    assert_shape_stable("a: |-\n  stripped\n\n\n");
    assert_shape_stable("a: |+\n  kept\n\n");
    assert_shape_stable("a: >\n  folded\n  text\n");
}

#[test]
fn comments() {
    assert_shape_stable("# standalone\na: 1\n");
    assert_shape_stable("a: 1 # inline\n");
    assert_shape_stable("a: 1\n# between\nb: 2\n");
}

#[test]
fn empty_values() {
    assert_shape_stable("a:\n");
    assert_shape_stable("a: ''\n");
    assert_shape_stable("-\n- x\n");
}

#[test]
fn emitted_structural_form_escapes_controls() {
    let doc = parse("a: \"x\\ty\\nz\"\nb: \"q\\\"quote\\\"\"\n").unwrap();
    let py = doc.as_py_struct(true);
    // Control characters and quotes never appear raw inside the literals.
    assert!(py.contains("\\t"));
    assert!(py.contains("\\n"));
    assert!(py.contains("\\\"quote\\\""));
    for window in py.split('"').skip(1).step_by(2) {
        assert!(!window.contains('\t'));
        assert!(!window.contains('\n'));
        assert!(!window.contains('\r'));
    }
}

#[test]
fn preserved_escape_sequences_survive() {
    // \u sequences are not expanded; they must round-trip verbatim.
    let doc = parse("a: \"pre \\u0041 post\"\n").unwrap();
    assert_eq!(doc.root().get("a").unwrap().as_str().unwrap(), "pre \\u0041 post");
    let yaml = doc.as_yaml();
    let reparsed = parse(&yaml).unwrap();
    assert_eq!(
        reparsed.root().get("a").unwrap().as_str().unwrap(),
        "pre \\u0041 post"
    );
}
