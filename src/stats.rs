// Rating statistics over a whole catalog.

use crate::movie::{Catalog, Movie};

/// Summary of a non-empty catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    /// Highest rated movie. The first one in catalog order wins ties.
    pub best: Movie,
    /// Lowest rated movie. The first one in catalog order wins ties.
    pub worst: Movie,
}

/// Reduce the catalog to its statistics; `None` for an empty catalog.
pub fn compute(catalog: &Catalog) -> Option<Stats> {
    let mut iter = catalog.iter();
    let first = iter.next()?;

    let mut best = first;
    let mut worst = first;
    let mut total = first.rating;
    for movie in iter {
        total += movie.rating;
        if movie.rating > best.rating {
            best = movie;
        }
        if movie.rating < worst.rating {
            worst = movie;
        }
    }

    let count = catalog.len();
    Some(Stats {
        count,
        average: total / count as f64,
        median: median(catalog),
        best: best.clone(),
        worst: worst.clone(),
    })
}

fn median(catalog: &Catalog) -> f64 {
    let mut ratings: Vec<f64> = catalog.iter().map(|m| m.rating).collect();
    ratings.sort_by(f64::total_cmp);
    let mid = ratings.len() / 2;
    if ratings.len() % 2 == 0 {
        (ratings[mid - 1] + ratings[mid]) / 2.0
    } else {
        ratings[mid]
    }
}
