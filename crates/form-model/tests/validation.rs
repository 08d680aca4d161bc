use pretty_assertions::assert_eq;
use serde_json::json;

use form_model::{
    ErrorKind, FormArrayField, FormField, FormNode, FormObjectField, FormValue, MessageCatalog,
    NumberInput, StringInput,
};

fn sku(index: usize) -> FormObjectField {
    FormObjectField::new(
        format!("sku-{index}"),
        format!("sku-{index}"),
        "名称",
        true,
    )
    .with_field(
        "name",
        FormField::new(
            format!("sku-name-{index}"),
            format!("sku-name-{index}"),
            "名称",
            true,
            StringInput::new(format!("sku-name-{index}")),
        ),
    )
    .with_field(
        "number",
        FormField::new(
            format!("sku-number-{index}"),
            format!("sku-number-{index}"),
            "数量",
            true,
            NumberInput::new(format!("sku-number-{index}")),
        ),
    )
    .with_field(
        "price",
        FormField::new(
            format!("sku-price-{index}"),
            format!("sku-price-{index}"),
            "价格",
            true,
            NumberInput::new(format!("sku-price-{index}")),
        ),
    )
}

fn goods() -> FormObjectField {
    FormObjectField::new("goods", "goods", "商品", true)
        .with_field(
            "name",
            FormField::new("name", "name", "名称", true, StringInput::new("name")),
        )
        .with_field("skus", FormArrayField::new("skus", "skus", "SKU", true, sku))
}

fn shape(node: &FormNode) -> Vec<(String, String, String)> {
    node.as_object()
        .expect("object element")
        .fields()
        .map(|(name, child)| {
            (
                name.to_string(),
                child.id().to_string(),
                child.label().to_string(),
            )
        })
        .collect()
}

#[test]
fn empty_goods_form_reports_name_and_skus() {
    let goods = goods();
    let result = goods.validate_values();

    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].field_id, "name");
    assert_eq!(result.errors[0].message, "名称不能为空");
    assert_eq!(result.errors[1].field_id, "skus");
    assert_eq!(result.errors[1].message, "SKU不能为空");
}

#[test]
fn filled_goods_form_is_valid_and_yields_nested_values() {
    let mut goods = goods();
    goods.single_mut("name").unwrap().set_value("iPhone16Pro");

    let skus = goods.array_mut("skus").unwrap();
    let element = skus.append().as_object_mut().unwrap();
    element.single_mut("name").unwrap().set_value("512G");
    element.single_mut("number").unwrap().set_value(10);
    element.single_mut("price").unwrap().set_value(1888);

    let result = goods.validate_values();
    assert!(result.is_valid);
    assert!(result.errors.is_empty());

    let values = FormValue::Object(goods.values());
    assert_eq!(
        values.to_json(),
        json!({
            "name": "iPhone16Pro",
            "skus": [{ "name": "512G", "number": 10, "price": 1888 }]
        })
    );
}

#[test]
fn appended_element_has_factory_shape() {
    let mut goods = goods();
    let skus = goods.array_mut("skus").unwrap();
    for expected_len in 1..=3 {
        let index = skus.len();
        let expected = shape(&skus.template(index));
        let appended = shape(skus.append());
        assert_eq!(appended, expected);
        assert_eq!(skus.len(), expected_len);
    }
    assert_eq!(skus.get(2).map(FormNode::id), Some("sku-2"));
}

#[test]
fn element_errors_count_additively() {
    let mut goods = goods();
    goods.single_mut("name").unwrap().set_value("iPad");
    let skus = goods.array_mut("skus").unwrap();
    skus.append();
    let second = skus.append().as_object_mut().unwrap();
    second.single_mut("name").unwrap().set_value("1T");

    let result = goods.validate_values();
    assert_eq!(result.errors.len(), 5);
    let ids: Vec<_> = result.errors.iter().map(|error| error.field_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "sku-name-0",
            "sku-number-0",
            "sku-price-0",
            "sku-number-1",
            "sku-price-1"
        ]
    );
    assert!(result.errors.iter().all(|error| error.kind == ErrorKind::Required));
}

#[test]
fn repeated_validation_returns_equal_results() {
    let mut goods = goods();
    goods.array_mut("skus").unwrap().append();
    let first = goods.validate_values();
    let second = goods.validate_values();
    assert_eq!(first, second);
}

#[test]
fn removing_the_only_sku_makes_the_array_empty_again() {
    let mut goods = goods();
    goods.single_mut("name").unwrap().set_value("iPhone16Pro");
    let skus = goods.array_mut("skus").unwrap();
    skus.append();
    assert!(skus.remove(0).is_some());
    assert!(skus.is_empty());

    let result = goods.validate_values();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].field_id, "skus");
}

#[test]
fn custom_catalog_changes_wording_only() {
    let goods = goods();
    let result = goods.validate_values_with(&MessageCatalog::english());
    let messages: Vec<_> = result.errors.iter().map(|error| error.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["名称 must not be empty", "SKU must not be empty"]
    );
    assert_eq!(result.errors.len(), goods.validate_values().errors.len());
}

#[test]
fn validation_result_serializes_with_error_codes() {
    let result = goods().validate_values();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["errors"][0]["code"], "required");
    assert_eq!(json["errors"][0]["field_id"], "name");
}
