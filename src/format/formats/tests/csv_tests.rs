//! Tests for the CSV format.

use image::DynamicImage;

use crate::format::formats::CsvFormat;
use crate::format::project::{AnnotationEntry, ExportData, ExportScope, PageEntry};
use crate::format::traits::ExportFormat;
use crate::model::{PageSource, Rect, Region};
use crate::state::{Action, Session};

fn region(id: u64, rect: Rect, text: &str) -> Region {
    let mut region = Region::new(id, rect);
    region.text = text.to_string();
    region
}

/// Two pages, two regions on the first, one on the second.
fn create_session() -> Session {
    let mut session = Session::new();
    session.add_pages(vec![
        PageSource::new("scan 1.png", DynamicImage::new_rgba8(300, 200)),
        PageSource::new("scan \"2\".png", DynamicImage::new_rgba8(300, 200)),
    ]);
    session.apply(Action::AddRect(region(
        1,
        Rect::new(10.4, 9.6, 100.2, 50.0),
        "Hi",
    )));
    session.apply(Action::AddRect(region(
        2,
        Rect::new(20.0, 80.0, 40.0, 30.0),
        "say \"hello\", twice",
    )));
    session.set_current_page_index(1);
    session.apply(Action::AddRect(region(1, Rect::new(0.5, 1.5, 9.5, 9.49), "")));
    session
}

#[test]
fn test_csv_format_metadata() {
    let format = CsvFormat;
    assert_eq!(format.id(), "csv");
    assert_eq!(format.display_name(), "CSV");
    assert_eq!(format.extension(), "csv");
}

#[test]
fn test_csv_all_pages() {
    let session = create_session();
    let data = ExportData::from_session(&session, ExportScope::AllPages).unwrap();
    let csv = CsvFormat.encode(&data).unwrap();

    let expected = "\
page_index,file_name,rect_id,x,y,width,height,text
1,\"scan 1.png\",1,10,10,100,50,\"Hi\"
1,\"scan 1.png\",2,20,80,40,30,\"say \"\"hello\"\", twice\"
2,\"scan \"\"2\"\".png\",1,1,2,10,9,\"\"
";
    assert_eq!(csv, expected);
}

#[test]
fn test_csv_current_page_uses_reduced_header() {
    let mut session = create_session();
    session.set_current_page_index(0);
    let data = ExportData::from_session(&session, ExportScope::CurrentPage).unwrap();
    let csv = CsvFormat.encode(&data).unwrap();

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("rect_id,x,y,width,height,text"));
    assert_eq!(lines.next(), Some("1,10,10,100,50,\"Hi\""));
    assert_eq!(lines.next(), Some("2,20,80,40,30,\"say \"\"hello\"\", twice\""));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_csv_multiline_text_stays_quoted() {
    let mut data = ExportData::new(ExportScope::CurrentPage);
    data.pages.push(
        PageEntry::new(1, "a.png").with_annotation(AnnotationEntry {
            id: 3,
            x: 1,
            y: 2,
            width: 30,
            height: 40,
            text: "line one\nline two".to_string(),
        }),
    );
    let csv = CsvFormat.encode(&data).unwrap();
    assert!(csv.ends_with("3,1,2,30,40,\"line one\nline two\"\n"));
}

#[test]
fn test_csv_numeric_text_is_left_bare() {
    let mut data = ExportData::new(ExportScope::AllPages);
    data.pages.push(PageEntry::new(4, "7.png").with_annotation(AnnotationEntry {
        id: 1,
        x: -3,
        y: 0,
        width: 12,
        height: 8,
        text: "42".to_string(),
    }));
    let csv = CsvFormat.encode(&data).unwrap();
    assert!(csv.ends_with("\n4,\"7.png\",1,-3,0,12,8,42\n"));
}

#[test]
fn test_csv_page_without_regions_has_header_only() {
    let mut session = Session::new();
    session.add_pages(vec![PageSource::new("empty.png", DynamicImage::new_rgba8(5, 5))]);
    let data = ExportData::from_session(&session, ExportScope::AllPages).unwrap();
    assert_eq!(
        CsvFormat.encode(&data).unwrap(),
        "page_index,file_name,rect_id,x,y,width,height,text\n"
    );
}

#[test]
fn test_csv_export_does_not_touch_session() {
    let session = create_session();
    let before: Vec<_> = session.pages()[0].regions().to_vec();
    let data = ExportData::from_session(&session, ExportScope::AllPages).unwrap();
    CsvFormat.encode(&data).unwrap();
    assert_eq!(session.pages()[0].regions(), before.as_slice());
}
