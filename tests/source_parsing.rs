use delimited_ingest::OpenError;
use delimited_ingest::source::{DelimitedSource, SourceDescriptor, SourceFormat};
use delimited_ingest::table::Row;

fn collect(source: DelimitedSource) -> Vec<Row> {
    let mut rows = Vec::new();
    source.parse(|_, fields| {
        rows.push(fields);
        true
    });
    rows
}

fn row(fields: &[&str]) -> Row {
    fields.iter().map(|s| s.to_string()).collect()
}

#[test]
fn parse_comma_file_in_source_order() {
    let descriptor = SourceDescriptor::new("tests/fixtures/letters.csv", SourceFormat::Csv);
    let source = DelimitedSource::open(&descriptor).unwrap();

    let rows = collect(source);
    assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"]), row(&["e", "f"])]);
}

#[test]
fn parse_tab_file_splits_on_tabs() {
    let descriptor = SourceDescriptor::new("tests/fixtures/letters.tsv", SourceFormat::Tsv);
    let source = DelimitedSource::open(&descriptor).unwrap();

    let rows = collect(source);
    assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"]), row(&["e", "f"])]);
}

#[test]
fn parse_from_string_source() {
    let source = DelimitedSource::from_string("x\ty\nz\tw\n", SourceFormat::Tsv);
    let rows = collect(source);
    assert_eq!(rows, vec![row(&["x", "y"]), row(&["z", "w"])]);
}

#[test]
fn rows_may_differ_in_field_count() {
    let descriptor = SourceDescriptor::new("tests/fixtures/ragged.csv", SourceFormat::Csv);
    let source = DelimitedSource::open(&descriptor).unwrap();

    let rows = collect(source);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], row(&["one"]));
    assert_eq!(rows[1], row(&["1", "2", "3"]));
    // Quoted field content passes through untouched, delimiter included.
    assert_eq!(rows[2], row(&["hello, world", "2"]));
}

#[test]
fn parse_empty_input_produces_no_rows() {
    let source = DelimitedSource::from_string("", SourceFormat::Csv);
    assert!(collect(source).is_empty());
}

#[test]
fn parse_stops_when_callback_declines() {
    let source = DelimitedSource::from_string("a,b\nc,d\ne,f\n", SourceFormat::Csv);

    let mut rows = Vec::new();
    source.parse(|_, fields| {
        rows.push(fields);
        false
    });
    assert_eq!(rows, vec![row(&["a", "b"])]);
}

#[test]
fn parse_indexes_rows_from_zero() {
    let source = DelimitedSource::from_string("a\nb\nc\n", SourceFormat::Csv);

    let mut indexes = Vec::new();
    source.parse(|index, _| {
        indexes.push(index);
        true
    });
    assert_eq!(indexes, vec![0, 1, 2]);
}

#[test]
fn open_missing_file_is_an_io_error() {
    let descriptor = SourceDescriptor::new("tests/fixtures/does_not_exist.csv", SourceFormat::Csv);
    let err = DelimitedSource::open(&descriptor).unwrap_err();
    assert!(matches!(err, OpenError::Io(_)), "got: {err}");
}

#[test]
fn format_inference_from_extension() {
    assert_eq!(
        SourceDescriptor::from_path("data.csv").unwrap().format,
        SourceFormat::Csv
    );
    assert_eq!(
        SourceDescriptor::from_path("data.tsv").unwrap().format,
        SourceFormat::Tsv
    );
    assert_eq!(
        SourceDescriptor::from_path("DATA.TAB").unwrap().format,
        SourceFormat::Tsv
    );

    let err = SourceDescriptor::from_path("data.xlsx").unwrap_err();
    assert!(matches!(err, OpenError::UnknownFormat { .. }), "got: {err}");
    let err = SourceDescriptor::from_path("no_extension").unwrap_err();
    assert!(matches!(err, OpenError::UnknownFormat { .. }), "got: {err}");
}

#[test]
fn format_delimiters() {
    assert_eq!(SourceFormat::Csv.delimiter(), b',');
    assert_eq!(SourceFormat::Tsv.delimiter(), b'\t');
}
