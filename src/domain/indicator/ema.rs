//! Exponential Moving Average.
//!
//! k = 2/(span+1), seeded with the first value (no SMA seed), then
//! EMA[i] = x[i]*k + EMA[i-1]*(1-k). Defined from the first finite input on.

pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if span == 0 {
        return out;
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut ema: Option<f64> = None;

    for (i, &x) in values.iter().enumerate() {
        ema = match ema {
            None if x.is_finite() => Some(x),
            None => None,
            Some(prev) => Some(x * k + prev * (1.0 - k)),
        };
        if let Some(v) = ema {
            out[i] = v;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_seed_is_first_value() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(series[0], 10.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0], 3);
        let k = 2.0 / 4.0;

        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        let e3 = 40.0 * k + e2 * (1.0 - k);

        assert_relative_eq!(series[1], e1);
        assert_relative_eq!(series[2], e2);
        assert_relative_eq!(series[3], e3);
    }

    #[test]
    fn ema_span_1_tracks_input() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 1);
        assert_eq!(series, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_constant_input_stays_constant() {
        let series = calculate_ema(&[42.5; 300], 50);
        assert!(series.iter().all(|v| (v - 42.5).abs() < 1e-12));
    }

    #[test]
    fn ema_skips_leading_nan() {
        let series = calculate_ema(&[f64::NAN, f64::NAN, 5.0, 7.0], 3);
        assert!(series[0].is_nan());
        assert!(series[1].is_nan());
        assert_relative_eq!(series[2], 5.0);
        assert_relative_eq!(series[3], 6.0);
    }

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 20).is_empty());
    }

    #[test]
    fn ema_span_0_is_undefined() {
        let series = calculate_ema(&[10.0, 20.0], 0);
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|v| v.is_nan()));
    }
}
