use indexmap::IndexMap;
use ndarray::Array2;
use selector_model::{
    ArrayMapper, Fallback, LabelMapper, OpaqueTransform, RegionsSelector, Scalar, Selection,
    TransformRef,
};
use selector_tree::{
    ConvertError, Converter, LabelMapperConverter, Node, NodeMap, RegionsSelectorConverter,
};

const TAG: &str = "tag:stsci.edu:gwcs/regions_selector-1.2.0";

fn slit(name: &str) -> TransformRef {
    TransformRef::new(OpaqueTransform::new(name, ["x", "y"], ["x", "y"]))
}

fn mask_mapper() -> LabelMapper {
    let mask = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 2.0, 2.0])
        .expect("2x2 mask")
        .into_dyn();
    LabelMapper::from(ArrayMapper::new(mask, None))
}

fn node_of(fields: Vec<(&str, Node)>) -> NodeMap {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn selector_node(label_mapper: Node, t1: &TransformRef, t2: &TransformRef) -> NodeMap {
    node_of(vec![
        ("inputs", Node::names(["x", "y"])),
        ("outputs", Node::names(["x", "y"])),
        (
            "selector",
            Node::Map(node_of(vec![
                (
                    "labels",
                    Node::Seq(vec![Node::Str("a".into()), Node::Str("b".into())]),
                ),
                (
                    "transforms",
                    Node::Seq(vec![
                        Node::Transform(t1.clone()),
                        Node::Transform(t2.clone()),
                    ]),
                ),
            ])),
        ),
        ("label_mapper", label_mapper),
        ("undefined_transform_value", Node::Int(0)),
    ])
}

#[test]
fn regions_selector_scenario() {
    let (t1, t2) = (slit("t1"), slit("t2"));
    let lm = TransformRef::new(mask_mapper());
    let node = selector_node(Node::Transform(lm), &t1, &t2);

    let conv = RegionsSelectorConverter::new();
    let decoded = conv.decode(&node, TAG).unwrap();
    assert_eq!(decoded.selector.len(), 2);
    assert_eq!(decoded.selector[&Scalar::from("a")], t1);
    assert_eq!(decoded.selector[&Scalar::from("b")], t2);
    assert_eq!(decoded.label_mapper, mask_mapper());
    assert_eq!(
        decoded.undefined_transform_value,
        Fallback::Value(Scalar::Int(0))
    );

    let out = conv.encode(&decoded).unwrap();
    let keys: Vec<_> = out.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "inputs",
            "outputs",
            "selector",
            "label_mapper",
            "undefined_transform_value"
        ]
    );
    assert_eq!(out["inputs"], node["inputs"]);
    assert_eq!(out["outputs"], node["outputs"]);
    assert_eq!(out["selector"], node["selector"]);
    assert_eq!(out["undefined_transform_value"], Node::Int(0));
    let nested = out["label_mapper"].as_transform().expect("nested transform");
    assert_eq!(nested.as_label_mapper(), Some(&mask_mapper()));
}

#[test]
fn roundtrip_preserves_selector_order_and_fallback_transform() {
    let fallback = slit("fallback");
    let mut table = IndexMap::new();
    table.insert(Scalar::Int(7), slit("seven"));
    table.insert(Scalar::Int(3), slit("three"));
    let model = RegionsSelector::new(
        vec!["x".into(), "y".into()],
        vec!["ra".into(), "dec".into(), "lam".into()],
        table,
        mask_mapper(),
        Fallback::Transform(fallback.clone()),
    );

    let conv = RegionsSelectorConverter::new();
    let back = conv.decode(&conv.encode(&model).unwrap(), TAG).unwrap();
    assert_eq!(back, model);
    let order: Vec<_> = back.labels().cloned().collect();
    assert_eq!(order, vec![Scalar::Int(7), Scalar::Int(3)]);
    assert_eq!(back.select(&Scalar::Int(9)), Selection::Undefined(&Fallback::Transform(fallback)));
}

#[test]
fn inline_label_mapper_needs_a_decoding_resolver() {
    let (t1, t2) = (slit("t1"), slit("t2"));
    let inline = LabelMapperConverter::new()
        .encode_label_mapper(&mask_mapper())
        .expect("encode array mapper");
    let node = selector_node(Node::Map(inline), &t1, &t2);

    let conv = RegionsSelectorConverter::new();
    assert!(matches!(
        conv.decode(&node, TAG),
        Err(ConvertError::InvalidField {
            field: "label_mapper",
            ..
        })
    ));

    let decoded = conv
        .decode_with(&node, &LabelMapperConverter::new())
        .unwrap();
    assert_eq!(decoded.label_mapper, mask_mapper());
}

#[test]
fn duplicate_selector_labels_keep_last_transform() {
    let (t1, t2) = (slit("t1"), slit("t2"));
    let mut node = selector_node(Node::Transform(TransformRef::new(mask_mapper())), &t1, &t2);
    node.insert(
        "selector".into(),
        Node::Map(node_of(vec![
            ("labels", Node::Seq(vec![Node::Int(1), Node::Int(1)])),
            (
                "transforms",
                Node::Seq(vec![Node::Transform(t1), Node::Transform(t2.clone())]),
            ),
        ])),
    );
    let decoded = RegionsSelectorConverter::new().decode(&node, TAG).unwrap();
    assert_eq!(decoded.selector.len(), 1);
    assert_eq!(decoded.selector[&Scalar::Int(1)], t2);
}

#[test]
fn required_fields_have_no_defaults() {
    let (t1, t2) = (slit("t1"), slit("t2"));
    let full = selector_node(Node::Transform(TransformRef::new(mask_mapper())), &t1, &t2);
    for field in [
        "inputs",
        "outputs",
        "selector",
        "label_mapper",
        "undefined_transform_value",
    ] {
        let mut node = full.clone();
        node.shift_remove(field);
        match RegionsSelectorConverter::new().decode(&node, TAG) {
            Err(ConvertError::MissingField(missing)) => assert_eq!(missing, field),
            other => panic!("expected missing {field}, got {other:?}"),
        }
    }
}

#[test]
fn non_selector_models_cannot_be_encoded() {
    let err = RegionsSelectorConverter::new()
        .encode(&mask_mapper())
        .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::UnrecognizedType {
            expected: "RegionsSelector",
            ..
        }
    ));
}
