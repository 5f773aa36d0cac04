//! Tests for the JSON format.

use image::DynamicImage;
use serde_json::{Value, json};

use crate::format::formats::JsonFormat;
use crate::format::project::{ExportData, ExportScope};
use crate::format::traits::ExportFormat;
use crate::model::{PageSource, Rect, Region};
use crate::state::{Action, Session};

fn create_session() -> Session {
    let mut session = Session::new();
    session.add_pages(vec![
        PageSource::new("receipt.jpg", DynamicImage::new_rgba8(300, 200)),
        PageSource::new("invoice.jpg", DynamicImage::new_rgba8(300, 200)),
    ]);
    let mut hi = Region::new(1, Rect::new(10.4, 9.6, 100.2, 50.0));
    hi.text = "Hi".to_string();
    session.apply(Action::AddRect(hi));
    session.apply(Action::AddRect(Region::new(2, Rect::new(30.0, 70.0, 60.7, 20.2))));
    session
}

fn encode(session: &Session, scope: ExportScope) -> Value {
    let data = ExportData::from_session(session, scope)
        .unwrap()
        .with_timestamp("2024-01-02T03:04:05Z");
    let text = JsonFormat.encode(&data).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_json_format_metadata() {
    let format = JsonFormat;
    assert_eq!(format.id(), "json");
    assert_eq!(format.extension(), "json");
}

#[test]
fn test_json_current_page_rounds_and_keeps_empty_text() {
    let session = create_session();
    let value = encode(&session, ExportScope::CurrentPage);

    assert_eq!(
        value,
        json!({
            "version": "1.0",
            "exported_at": "2024-01-02T03:04:05Z",
            "pages": [{
                "page_index": 1,
                "file_name": "receipt.jpg",
                "annotations": [
                    { "id": 1, "x": 10, "y": 10, "width": 100, "height": 50, "text": "Hi" },
                    { "id": 2, "x": 30, "y": 70, "width": 61, "height": 20, "text": "" }
                ]
            }]
        })
    );
}

#[test]
fn test_json_all_pages_in_upload_order() {
    let session = create_session();
    let value = encode(&session, ExportScope::AllPages);

    let pages = value["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1]["page_index"], 2);
    assert_eq!(pages[1]["file_name"], "invoice.jpg");
    assert_eq!(pages[1]["annotations"], json!([]));
}

#[test]
fn test_json_has_fresh_timestamp() {
    let session = create_session();
    let data = ExportData::from_session(&session, ExportScope::AllPages).unwrap();
    let value: Value = serde_json::from_str(&JsonFormat.encode(&data).unwrap()).unwrap();
    let stamp = value["exported_at"].as_str().unwrap();
    assert!(stamp.ends_with('Z'));
    assert_eq!(stamp.as_bytes()[10], b'T');
}
