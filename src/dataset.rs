//! Raw dataset loading.
//!
//! The catalog is built from two CSV tables: movie metadata (overview, genres,
//! keywords) and credits (cast, crew). They are joined on `title`, rows with
//! missing fields are dropped, and the JSON-encoded entity lists are decoded
//! into typed records.

use serde::Deserialize;
use std::{
    collections::HashMap,
    io::Read,
    path::{Path, PathBuf},
    time::Instant,
};

const MOVIES_COLUMNS: [&str; 5] = ["id", "title", "overview", "genres", "keywords"];
const CREDITS_COLUMNS: [&str; 4] = ["movie_id", "title", "cast", "crew"];

/// A named entity inside a genres/keywords/cast list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedEntity {
    pub name: String,
}

/// A crew entry; only directors are used for tagging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
}

/// A joined, validated movie row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub genres: Vec<NamedEntity>,
    pub keywords: Vec<NamedEntity>,
    pub cast: Vec<NamedEntity>,
    pub crew: Vec<CrewMember>,
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("couldn't read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error in {table} table: {source}")]
    Csv {
        table: &'static str,
        source: csv::Error,
    },

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("row {row} ('{title}'): movie_id '{value}' is not an integer")]
    InvalidId {
        row: usize,
        title: String,
        value: String,
    },

    #[error("row {row} ('{title}'): malformed {column} list: {source}")]
    MalformedField {
        row: usize,
        title: String,
        column: &'static str,
        source: serde_json::Error,
    },
}

/// Locations of the two raw tables.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub movies: PathBuf,
    pub credits: PathBuf,
}

#[derive(Debug, Deserialize)]
struct MovieRow {
    title: Option<String>,
    overview: Option<String>,
    genres: Option<String>,
    keywords: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreditRow {
    movie_id: Option<String>,
    title: Option<String>,
    cast: Option<String>,
    crew: Option<String>,
}

/// A joined row where every required field is present, still undecoded.
struct JoinedRow<'a> {
    movie_id: &'a str,
    title: &'a str,
    overview: &'a str,
    genres: &'a str,
    keywords: &'a str,
    cast: &'a str,
    crew: &'a str,
}

/// Load and join both tables from disk.
pub fn load(paths: &DatasetPaths) -> Result<Vec<MovieRecord>, LoadError> {
    let movies = open(&paths.movies)?;
    let credits = open(&paths.credits)?;

    log::info!(
        "reading dataset from {} and {}",
        paths.movies.display(),
        paths.credits.display()
    );

    read_tables(movies, credits)
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Join the movies and credits tables read from arbitrary sources.
pub fn read_tables<M: Read, C: Read>(movies: M, credits: C) -> Result<Vec<MovieRecord>, LoadError> {
    let now = Instant::now();

    let movies: Vec<MovieRow> = read_table(movies, "movies", &MOVIES_COLUMNS)?;
    let credits: Vec<CreditRow> = read_table(credits, "credits", &CREDITS_COLUMNS)?;

    let mut credits_by_title: HashMap<&str, Vec<&CreditRow>> = HashMap::new();
    for credit in &credits {
        if let Some(title) = present(&credit.title) {
            credits_by_title.entry(title).or_default().push(credit);
        }
    }

    let mut joined = 0;
    let mut rows = vec![];
    for movie in &movies {
        let Some(title) = present(&movie.title) else {
            continue;
        };
        let Some(matches) = credits_by_title.get(title) else {
            continue;
        };

        for credit in matches {
            joined += 1;
            if let Some(row) = complete_row(movie, credit) {
                rows.push(row);
            }
        }
    }

    let dropped = joined - rows.len();
    if dropped > 0 {
        log::info!("dropped {dropped} of {joined} joined rows with missing fields");
    }

    let records = rows
        .iter()
        .enumerate()
        .map(|(row, joined)| decode_row(row, joined))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "took {}ms to read dataset ({} records)",
        now.elapsed().as_micros() as f64 / 1000.0,
        records.len()
    );

    Ok(records)
}

fn read_table<R, T>(
    source: R,
    table: &'static str,
    required: &[&'static str],
) -> Result<Vec<T>, LoadError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv::Reader::from_reader(source);

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv { table, source })?
        .clone();
    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(LoadError::MissingColumn { table, column });
        }
    }

    reader
        .deserialize()
        .map(|row| row.map_err(|source| LoadError::Csv { table, source }))
        .collect()
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn complete_row<'a>(movie: &'a MovieRow, credit: &'a CreditRow) -> Option<JoinedRow<'a>> {
    Some(JoinedRow {
        movie_id: present(&credit.movie_id)?,
        title: present(&movie.title)?,
        overview: present(&movie.overview)?,
        genres: present(&movie.genres)?,
        keywords: present(&movie.keywords)?,
        cast: present(&credit.cast)?,
        crew: present(&credit.crew)?,
    })
}

fn decode_row(row: usize, joined: &JoinedRow) -> Result<MovieRecord, LoadError> {
    let title = joined.title;

    let id = joined
        .movie_id
        .trim()
        .parse::<u64>()
        .map_err(|_| LoadError::InvalidId {
            row,
            title: title.to_string(),
            value: joined.movie_id.to_string(),
        })?;

    Ok(MovieRecord {
        id,
        title: title.to_string(),
        overview: joined.overview.to_string(),
        genres: decode_list(row, title, "genres", joined.genres)?,
        keywords: decode_list(row, title, "keywords", joined.keywords)?,
        cast: decode_list(row, title, "cast", joined.cast)?,
        crew: decode_list(row, title, "crew", joined.crew)?,
    })
}

fn decode_list<T: for<'de> Deserialize<'de>>(
    row: usize,
    title: &str,
    column: &'static str,
    raw: &str,
) -> Result<Vec<T>, LoadError> {
    serde_json::from_str(raw).map_err(|source| LoadError::MalformedField {
        row,
        title: title.to_string(),
        column,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "\
budget,genres,id,keywords,overview,title
100,\"[{\"\"id\"\": 28, \"\"name\"\": \"\"Action\"\"}]\",1,\"[{\"\"id\"\": 1, \"\"name\"\": \"\"space war\"\"}]\",A war in space.,Alpha
200,[],2,[],Quiet drama.,Beta
";

    const CREDITS: &str = "\
movie_id,title,cast,crew
1,Alpha,\"[{\"\"name\"\": \"\"Jane Doe\"\", \"\"character\"\": \"\"X\"\"}]\",\"[{\"\"name\"\": \"\"Sam Roe\"\", \"\"job\"\": \"\"Director\"\"}]\"
2,Beta,[],[]
";

    #[test]
    fn test_join_decodes_entities() {
        let records = read_tables(MOVIES.as_bytes(), CREDITS.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let alpha = &records[0];
        assert_eq!(alpha.id, 1);
        assert_eq!(alpha.title, "Alpha");
        assert_eq!(alpha.genres, vec![NamedEntity { name: "Action".into() }]);
        assert_eq!(alpha.keywords[0].name, "space war");
        assert_eq!(alpha.cast[0].name, "Jane Doe");
        assert_eq!(
            alpha.crew,
            vec![CrewMember {
                name: "Sam Roe".into(),
                job: "Director".into()
            }]
        );

        assert!(records[1].genres.is_empty());
    }

    #[test]
    fn test_unmatched_title_is_not_joined() {
        let credits = "movie_id,title,cast,crew\n1,Alpha,[],[]\n";
        let records = read_tables(MOVIES.as_bytes(), credits.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Alpha");
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let credits = "movie_id,title,cast\n1,Alpha,[]\n";
        let err = read_tables(MOVIES.as_bytes(), credits.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn {
                table: "credits",
                column: "crew"
            }
        ));
    }

    #[test]
    fn test_invalid_id_is_fatal() {
        let credits = "movie_id,title,cast,crew\nabc,Alpha,[],[]\n";
        let err = read_tables(MOVIES.as_bytes(), credits.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidId { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let paths = DatasetPaths {
            movies: PathBuf::from("/nonexistent/movies.csv"),
            credits: PathBuf::from("/nonexistent/credits.csv"),
        };
        assert!(matches!(load(&paths), Err(LoadError::Io { .. })));
    }
}
