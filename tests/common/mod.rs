use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// A full catalog record in the source feed's shape: 17 mapped fields,
/// the loose `MM/YYYY` date, and the nested `{value, unit}` volume.
/// `ibu` and `image_url` are null to exercise null-marker mapping.
pub fn beer(id: i64, name: &str, first_brewed: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "tagline": "Post Modern Classic.",
        "first_brewed": first_brewed,
        "description": "A light, crisp and bitter IPA.",
        "image_url": null,
        "abv": 5.6,
        "ibu": null,
        "target_fg": 1010.0,
        "target_og": 1056.0,
        "ebc": 17.0,
        "srm": 8.5,
        "ph": 4.4,
        "attenuation_level": 82.14,
        "contributed_by": "Sam Mason <samjbmason>",
        "brewers_tips": "The earthy and floral aromas from the hops can be overpowering.",
        "volume": { "value": 20, "unit": "litres" }
    })
}

/// Write records as plain NDJSON.
pub fn write_jsonl(path: &Path, records: &[Value]) {
    let mut f = File::create(path).unwrap();
    for r in records {
        writeln!(&mut f, "{r}").unwrap();
    }
}

/// Write records as zstd-compressed NDJSON, mirroring a compressed feed dump.
pub fn write_zst_jsonl(path: &Path, records: &[Value]) {
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for r in records {
        writeln!(&mut enc, "{r}").unwrap();
    }
    enc.finish().unwrap();
}

/// Read a text file line-by-line (drops empty lines).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    BufReader::new(f)
        .lines()
        .map(|l| l.unwrap())
        .filter(|s| !s.is_empty())
        .collect()
}
