#![cfg(feature = "parser")]

use std::error::Error;

use chrono::NaiveDate;
use lucc::parser::{parse_query, ParseQueryError};
use lucc::raster::{Brick, Coord};
use lucc::{Dataset, LabelSet, Predicate, Timeline};

fn date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 9, 1).unwrap()
}

fn dataset_parts() -> (Brick, Timeline, LabelSet) {
    let timeline = Timeline::parse(["2001-09-01", "2002-09-01", "2003-09-01"]).unwrap();
    let labels = LabelSet::new(["Forest", "Pasture", "Deforestation"]).unwrap();

    let mut brick = Brick::new(3);
    brick.insert(Coord::from((5, 5)), vec![1, 1, 3]).unwrap();
    brick.insert(Coord::from((7, 7)), vec![1, 3, 1]).unwrap();
    brick.insert(Coord::from((9, 9)), vec![2, 2, 2]).unwrap();

    (brick, timeline, labels)
}

#[test]
fn evaluate_parsed_queries() -> Result<(), Box<dyn Error>> {
    let (brick, timeline, labels) = dataset_parts();
    let data = Dataset::new(&brick, &timeline, &labels)?;

    let holds = parse_query("holds(Pasture, [2001-09-01, 2003-09-01])")?.evaluate(&data)?;
    assert_eq!(holds.coords().collect::<Vec<_>>(), vec![Coord::from((9, 9))]);

    let recur = parse_query("recur(Forest, 2001-09-01, [2002-09-01, 2003-09-01])")?.evaluate(&data)?;
    assert_eq!(recur.coords().collect::<Vec<_>>(), vec![Coord::from((7, 7))]);

    let query = "evolve(holds(Forest, 2001-09-01), holds(Deforestation, [2002-09-01, 2003-09-01], contains))";
    let evolve = parse_query(query)?.evaluate(&data)?;
    assert_eq!(evolve.coords().collect::<Vec<_>>(), vec![Coord::from((5, 5)), Coord::from((7, 7))]);

    let convert = parse_query("convert(holds(Forest, 2002-09-01), holds(Deforestation, 2003-09-01), keep_columns)")?
        .evaluate(&data)?;
    assert_eq!(convert.columns(), &[date(2002), date(2003)]);
    assert_eq!(convert.cell(&Coord::from((5, 5)), date(2002)), Some("Forest"));

    let sweep = parse_query("sweep(Forest, Deforestation)")?.evaluate(&data)?;
    assert_eq!(sweep.len(), 2);

    Ok(())
}

#[test]
fn errors_reach_the_caller() -> Result<(), Box<dyn Error>> {
    let (brick, timeline, labels) = dataset_parts();
    let data = Dataset::new(&brick, &timeline, &labels)?;

    let query = parse_query("holds(Cerrado, 2001-09-01)")?;
    assert!(query.evaluate(&data).is_err());

    let query = parse_query("holds(Forest, 2004-09-01)")?;
    assert!(query.evaluate(&data).is_err());

    assert!(matches!(
        parse_query("holds(Forest, 2001-09-01))"),
        Err(ParseQueryError::Incomplete(_))
    ));

    Ok(())
}
