//! Null-aware reductions over plain values. Every function here skips `None`
//! values explicitly; a reduction over nothing but nulls yields `None`.

/// Index and value of the largest non-null entry. Ties keep the first one.
pub fn arg_max<I>(values: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, value) in values.into_iter().enumerate() {
        if let Some(v) = value {
            match best {
                Some((_, current)) if v <= current => {}
                _ => best = Some((index, v)),
            }
        }
    }
    best
}

/// Pearson correlation over the pairs where both sides are present.
/// `None` with fewer than two pairs or when either side has zero variance.
pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let points: Vec<(f64, f64)> = pairs
        .into_iter()
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();

    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_max_first_wins_ties() {
        assert_eq!(arg_max(vec![None, Some(4.1), Some(4.3), Some(4.3)]), Some((2, 4.3)));
        assert_eq!(arg_max(vec![None, None]), None);
    }

    #[test]
    fn test_pearson() {
        let perfect = pearson(vec![
            (Some(1.0), Some(2.0)),
            (Some(2.0), Some(4.0)),
            (None, Some(9.0)),
            (Some(3.0), Some(6.0)),
        ])
        .unwrap();
        assert!((perfect - 1.0).abs() < 1e-12);

        let inverse = pearson(vec![(Some(1.0), Some(3.0)), (Some(3.0), Some(1.0))]).unwrap();
        assert!((inverse + 1.0).abs() < 1e-12);

        assert_eq!(pearson(vec![(Some(1.0), Some(2.0))]), None);
        assert_eq!(pearson(vec![(Some(1.0), Some(2.0)), (Some(1.0), Some(3.0))]), None);
    }
}
