//! GeoNames `cities*.txt` dumps.

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{LayerError, LayerResult};
use crate::models::PlacePoint;

//schema (tab separated, no header)

//geonameid  name  asciiname  alternatenames  latitude  longitude  feature class  feature code
//country code  cc2  admin1 code  admin2 code  admin3 code  admin4 code  population  elevation
//dem  timezone  modification date
const NAME: usize = 1;
const ASCII_NAME: usize = 2;
const LATITUDE: usize = 4;
const LONGITUDE: usize = 5;
const COUNTRY_CODE: usize = 8;
const ADMIN1_CODE: usize = 10;
const POPULATION: usize = 14;

/// Load populated places, dropping rows below `min_population` or without
/// usable coordinates.
pub fn load_places(path: &Path, min_population: u64) -> LayerResult<Vec<PlacePoint>> {
    info!("Loading places from {}", path.display());

    let file = File::open(path).map_err(|e| LayerError::io(path, e))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    // Names contain stray quotes, so quoting is disabled
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut places = Vec::new();
    let mut dropped = 0usize;

    for result in csv_reader.records() {
        let record = result.map_err(|e| LayerError::csv(path, e))?;

        let field = |i: usize| record.get(i).unwrap_or("").trim();
        let lat = field(LATITUDE).parse::<f64>().ok();
        let lon = field(LONGITUDE).parse::<f64>().ok();
        let population = field(POPULATION).parse::<u64>().unwrap_or(0);
        let name = PlacePoint::preferred_name(field(NAME), field(ASCII_NAME));

        let (Some(lat), Some(lon)) = (lat, lon) else {
            dropped += 1;
            continue;
        };
        if name.is_empty() || !lat.is_finite() || !lon.is_finite() || population < min_population {
            dropped += 1;
            continue;
        }

        let mut place = PlacePoint::new(name, lat, lon, population, field(COUNTRY_CODE));
        let admin = field(ADMIN1_CODE);
        if !admin.is_empty() {
            place.admin_code = Some(admin.to_string());
        }
        places.push(place);
    }

    debug!("Dropped {} place rows", dropped);
    info!("Loaded {} places (population >= {})", places.len(), min_population);
    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const ROWS: &str = "\
293397\tTel Aviv\tTel Aviv\tTLV\t32.08088\t34.78057\tP\tPPLA\tIL\t\t05\t\t\t\t432892\t\t15\tAsia/Jerusalem\t2023-01-01
295530\tBe'er Sheva\tBe'er Sheva\t\t31.25181\t34.7913\tP\tPPLA\tIL\t\t01\t\t\t\t186600\t\t280\tAsia/Jerusalem\t2023-01-01
1\tTiny\tTiny\t\t31.0\t35.0\tP\tPPL\tIL\t\t01\t\t\t\t120\t\t0\tAsia/Jerusalem\t2023-01-01
2\tBroken\tBroken\t\tnot-a-number\t35.0\tP\tPPL\tIL\t\t01\t\t\t\t9000\t\t0\tAsia/Jerusalem\t2023-01-01
250441\t\u{2018}Ajl\u{16b}n\tAjlun\t\t32.33326\t35.75279\tP\tPPLA\tjo\t\t20\t\t\t\t125557\t\t0\tAsia/Amman\t2023-01-01
";

    #[test]
    fn test_load_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities1000.txt");
        std::fs::write(&path, ROWS).unwrap();

        let places = load_places(&path, 500).unwrap();
        assert_eq!(places.len(), 3);

        assert_eq!(places[0].name, "Tel Aviv");
        assert_eq!(places[0].population, 432_892);
        assert_eq!(places[0].admin_code.as_deref(), Some("05"));
        assert_eq!(places[1].name, "Be'er Sheva");
        // ASCII name preferred, country code upper-cased
        assert_eq!(places[2].name, "Ajlun");
        assert_eq!(places[2].country_code, "JO");
    }

    #[test]
    fn test_load_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities1000.txt.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(ROWS.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let places = load_places(&path, 150_000).unwrap();
        let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Tel Aviv", "Be'er Sheva"]);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_places(Path::new("/nonexistent/cities.txt"), 0),
            Err(LayerError::Io { .. })
        ));
    }
}
