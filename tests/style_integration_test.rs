use serde_json::json;
use small_helpers::{
    assign_array, camelize, splice_array, style_pad_px, style_remove_px, Value,
};

/// 把 CSS 樣式表轉成 inline style 時的常見流程
#[test]
fn test_style_conversion_flow() {
    let style = Value::from(json!({
        "width": 120,
        "height": "48",
        "margin-left": 8,
        "background-color": "#fff",
        "line-height": "normal"
    }));

    let padded = style_pad_px(&style).unwrap();
    assert_eq!(
        serde_json::Value::try_from(&padded).unwrap(),
        json!({
            "width": "120px",
            "height": "48px",
            "margin-left": "8px",
            "background-color": "#fff",
            "line-height": "normal"
        })
    );

    let mut camel_keys: Vec<String> = padded
        .as_object()
        .unwrap()
        .keys()
        .iter()
        .map(|key| camelize(key))
        .collect();
    camel_keys.sort();
    assert_eq!(
        camel_keys,
        vec!["backgroundColor", "height", "lineHeight", "marginLeft", "width"]
    );

    let numbers = style_remove_px(&padded).unwrap();
    assert_eq!(numbers.get("width"), Some(Value::from(120)));
    assert_eq!(numbers.get("height"), Some(Value::from(48)));
    assert!(numbers.get("line-height").unwrap().as_f64().unwrap().is_nan());
}

#[test]
fn test_pixel_round_trip() {
    let style = Value::from(json!({"width": 10}));
    let back = style_remove_px(&style_pad_px(&style).unwrap()).unwrap();
    assert_eq!(back, style);
}

#[test]
fn test_array_helpers_together() {
    let selected = assign_array(&[
        Value::from(json!(["a", "b"])),
        Value::from(json!(["b", "c"])),
        Value::from("d"),
    ]);
    assert_eq!(selected, Value::from(json!(["a", "b", "c", "d"])));

    let remaining = splice_array(&selected, &[Value::from(json!(["a", "d"]))]).unwrap();
    assert_eq!(remaining, Value::from(json!(["b", "c"])));
}
