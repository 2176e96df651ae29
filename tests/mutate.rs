use yamlite::{parse, Document, ErrorKind};

#[test]
fn insert_remove_reinsert_cycle() {
    let mut doc = Document::new();
    doc.root_mut().set_map().unwrap();

    for i in 0..16 {
        let key = format!("k{i}");
        doc.root_mut().insert(&key, format!("v{i}")).unwrap();
    }
    assert_eq!(doc.root().len().unwrap(), 16);

    for i in (0..16).step_by(3) {
        let key = format!("k{i}");
        assert!(doc.root_mut().remove(&key).unwrap());
        assert!(!doc.root().has_key(&key).unwrap());
    }
    assert_eq!(doc.root().len().unwrap(), 10);

    for i in (0..16).step_by(3) {
        let key = format!("k{i}");
        doc.root_mut()
            .get_mut(&key)
            .unwrap()
            .set(format!("v{i}"))
            .unwrap();
    }
    assert_eq!(doc.root().len().unwrap(), 16);

    for i in 0..16 {
        let key = format!("k{i}");
        assert!(doc.root().has_key(&key).unwrap());
        assert_eq!(
            doc.root().get(&key).unwrap().decode::<String>().unwrap(),
            format!("v{i}")
        );
    }
}

#[test]
fn repeated_insert_remove_is_idempotent() {
    let mut doc = Document::new();
    doc.root_mut().set_map().unwrap();
    for _ in 0..50 {
        doc.root_mut().insert("key", "value").unwrap();
        assert!(doc.root().has_key("key").unwrap());
        assert_eq!(doc.root().len().unwrap(), 1);
        assert!(doc.root_mut().remove("key").unwrap());
        assert!(!doc.root().has_key("key").unwrap());
        assert_eq!(doc.root().len().unwrap(), 0);
    }
    assert!(!doc.root_mut().remove("key").unwrap());
}

#[test]
fn sequence_operations() {
    let mut doc = Document::new();
    doc.root_mut().set_sequence().unwrap();

    let mut root = doc.root_mut();
    for i in 0..5 {
        root.push_back(i as i64).unwrap();
    }
    assert_eq!(doc.root().len().unwrap(), 5);
    assert_eq!(doc.root().at(4).unwrap().decode::<i64>().unwrap(), 4);

    // Removal keeps the relative order of the others.
    doc.root_mut().remove_at(1).unwrap();
    let left: Vec<i64> = doc
        .root()
        .children()
        .unwrap()
        .map(|node| node.decode::<i64>().unwrap())
        .collect();
    assert_eq!(left, [0, 2, 3, 4]);

    doc.root_mut().insert_at(1, 99_i64).unwrap();
    assert_eq!(doc.root().at(1).unwrap().decode::<i64>().unwrap(), 99);

    doc.root_mut().pop_back().unwrap();
    assert_eq!(doc.root().len().unwrap(), 4);

    let err = doc.root().at(17).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Access);
    assert!(err.message.contains("out of array bounds"));
}

#[test]
fn nested_containers() {
    let mut doc = Document::new();
    doc.root_mut().set_map().unwrap();
    doc.root_mut().insert_sequence("items").unwrap();
    {
        let mut root = doc.root_mut();
        let mut items = root.get_mut("items").unwrap();
        items.push_back("one").unwrap();
        items.push_back_map().unwrap();
        let mut entry = items.at_mut(1).unwrap();
        entry.insert("name", "two").unwrap();
    }
    assert_eq!(
        doc.as_py_struct(false),
        "{'items' : [\"one\",{'name' : \"two\"}]}"
    );
    assert_eq!(doc.as_yaml(), "items:\n  - one\n  - name: two");
}

#[test]
fn assignment_through_absent_key_materializes() {
    let mut doc = parse("a: 1\n").unwrap();
    doc.root_mut().get_mut("b").unwrap().set(2_i64).unwrap();
    assert_eq!(doc.root().get("b").unwrap().decode::<i64>().unwrap(), 2);

    // Reading through an absent key is an error.
    let mut root = doc.root_mut();
    let pending = root.get_mut("missing").unwrap();
    let err = pending.as_node().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Access);
    assert!(err.message.contains("non-existent key"));
}

#[test]
fn duplicate_insert_is_rejected_before_writing() {
    let mut doc = parse("a: 1\n").unwrap();
    let err = doc.root_mut().insert("a", "again").unwrap_err();
    assert!(err.message.contains("duplicated key are forbidden"));
    // The previous value is untouched.
    assert_eq!(doc.root().get("a").unwrap().as_str().unwrap(), "1");
    assert_eq!(doc.root().len().unwrap(), 1);
}

#[test]
fn overwriting_a_value_in_place() {
    let mut doc = parse("a: old\n").unwrap();
    doc.root_mut().get_mut("a").unwrap().set("new").unwrap();
    assert_eq!(doc.root().get("a").unwrap().as_str().unwrap(), "new");
    assert_eq!(doc.as_yaml(), "a: new");
}

#[test]
fn rewriting_a_value_as_container() {
    let mut doc = parse("a: scalar\n").unwrap();
    {
        let mut root = doc.root_mut();
        let mut a = root.get_mut("a").unwrap();
        a.set_sequence().unwrap();
        a.push_back("x").unwrap();
    }
    assert_eq!(doc.as_py_struct(false), "{'a' : [\"x\"]}");
}

#[test]
fn kind_mismatch_errors() {
    let mut doc = parse("m:\n  k: v\ns:\n  - 1\n").unwrap();
    let root = doc.root();

    let err = root.get("m").unwrap().at(0).unwrap_err();
    assert!(err.message.contains("can only be used on Sequence elements"));

    let err = root.get("s").unwrap().get("k").unwrap_err();
    assert!(err.message.contains("can only be used on Map elements"));

    let err = root.get("m").unwrap().as_str().unwrap_err();
    assert!(err.message.contains("not of type 'Value'"));

    let mut root = doc.root_mut();
    let err = root.get_mut("s").unwrap().insert("k", "v").unwrap_err();
    assert!(err.message.contains("can only be used on Map elements"));

    let err = root.get_mut("m").unwrap().push_back("v").unwrap_err();
    assert!(err.message.contains("can only be used on Sequence elements"));
}

#[test]
fn empty_key_is_rejected() {
    let doc = parse("a: 1\n").unwrap();
    let err = doc.root().has_key("").unwrap_err();
    assert!(err.message.contains("empty key is not allowed"));
}

#[test]
fn typed_round_trip_through_mutation() {
    let mut doc = Document::new();
    doc.root_mut().set_map().unwrap();
    doc.root_mut().insert("count", 42_u64).unwrap();
    doc.root_mut().insert("ratio", 2.5_f64).unwrap();
    doc.root_mut().insert("on", true).unwrap();
    assert_eq!(doc.as_yaml(), "count: 42\nratio: 2.5\non: true");

    let back = parse(&doc.as_yaml()).unwrap();
    assert_eq!(back.root().get("count").unwrap().decode::<u64>().unwrap(), 42);
    assert_eq!(back.root().get("ratio").unwrap().decode::<f64>().unwrap(), 2.5);
    assert!(back.root().get("on").unwrap().decode::<bool>().unwrap());
}
