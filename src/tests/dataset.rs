use super::fixtures::{write_dataset, RawMovie};
use crate::catalog::CatalogBuilder;
use crate::dataset::{self, LoadError};

fn movies() -> Vec<RawMovie> {
    let mut avatar = RawMovie::new(19995, "Avatar", "A marine on an alien moon.");
    avatar.genres = vec!["Action".into(), "Science Fiction".into()];
    avatar.keywords = vec!["space war".into()];
    avatar.cast = vec!["Sam Worthington".into(), "Zoe Saldana".into()];
    avatar.directors = vec!["James Cameron".into()];

    let mut titanic = RawMovie::new(597, "Titanic", "A seventeen-year-old aristocrat falls in love.");
    titanic.genres = vec!["Drama".into(), "Romance".into()];
    titanic.directors = vec!["James Cameron".into()];

    vec![avatar, titanic, RawMovie::new(3, "Spectre", "A cryptic message.")]
}

#[test]
fn load_reads_both_tables() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_dataset(tmp.path(), &movies());

    let records = dataset::load(&paths).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].title, "Avatar");
    assert_eq!(records[0].id, 19995);
    assert_eq!(records[0].genres[1].name, "Science Fiction");
    assert_eq!(records[0].crew.len(), 2);
    assert_eq!(records[0].crew[1].job, "Director");
}

#[test]
fn record_with_missing_overview_is_dropped() {
    let tmp = tempfile::tempdir().unwrap();
    let mut movies = movies();
    movies[1].overview = String::new();
    let paths = write_dataset(tmp.path(), &movies);

    let records = dataset::load(&paths).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.title != "Titanic"));

    let catalog = CatalogBuilder::new().build(records);
    assert_eq!(catalog.titles(), ["Avatar", "Spectre"]);
    assert_eq!(catalog.index().index_of("Spectre"), Some(1));
}

#[test]
fn malformed_entity_list_fails_load() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_dataset(tmp.path(), &movies());

    let credits = std::fs::read_to_string(&paths.credits).unwrap();
    let credits = credits.replacen("[{", "[{broken", 1);
    std::fs::write(&paths.credits, credits).unwrap();

    let err = dataset::load(&paths).unwrap_err();
    assert!(matches!(err, LoadError::MalformedField { column: "cast", .. }));
}

#[test]
fn entity_without_name_fails_load() {
    let movies = "id,title,overview,genres,keywords\n1,A,Story,\"[{\"\"id\"\": 1}]\",[]\n";
    let credits = "movie_id,title,cast,crew\n1,A,[],[]\n";

    let err = dataset::read_tables(movies.as_bytes(), credits.as_bytes()).unwrap_err();
    assert!(matches!(err, LoadError::MalformedField { column: "genres", .. }));
}

#[test]
fn malformed_field_in_dropped_record_is_ignored() {
    let movies = "id,title,overview,genres,keywords\n1,A,,not json,[]\n2,B,Story,[],[]\n";
    let credits = "movie_id,title,cast,crew\n1,A,[],[]\n2,B,[],[]\n";

    let records = dataset::read_tables(movies.as_bytes(), credits.as_bytes()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "B");
}

#[test]
fn duplicate_titles_join_every_match() {
    let movies = "id,title,overview,genres,keywords\n1,The Host,One,[],[]\n2,The Host,Two,[],[]\n";
    let credits = "movie_id,title,cast,crew\n1,The Host,[],[]\n2,The Host,[],[]\n";

    let records = dataset::read_tables(movies.as_bytes(), credits.as_bytes()).unwrap();
    let rows: Vec<(&str, u64)> = records
        .iter()
        .map(|r| (r.overview.as_str(), r.id))
        .collect();
    assert_eq!(rows, vec![("One", 1), ("One", 2), ("Two", 1), ("Two", 2)]);
}

#[test]
fn missing_movies_column_fails_load() {
    let movies = "id,title,genres,keywords\n1,A,[],[]\n";
    let credits = "movie_id,title,cast,crew\n1,A,[],[]\n";

    let err = dataset::read_tables(movies.as_bytes(), credits.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::MissingColumn {
            table: "movies",
            column: "overview"
        }
    ));
}
