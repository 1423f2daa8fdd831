use crate::config::{DrawRegressionConfig, MAX_DRAW_BONUS};

/// Draw probability bonus for sides that have gone a long time without a
/// draw. The result lies in `[0, cap]`, never above [`MAX_DRAW_BONUS`], and
/// never decreases as either streak grows.
pub fn draw_regression_bonus(cfg: &DrawRegressionConfig, home_streak: u32, away_streak: u32) -> f64 {
    let step = cfg.step.max(0.0);
    let over = |streak: u32| streak.saturating_sub(cfg.streak_threshold) as f64 * step;
    let cap = cfg.cap.max(0.0).min(MAX_DRAW_BONUS);
    (over(home_streak) + over(away_streak)).clamp(0.0, cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonus(h: u32, a: u32) -> f64 {
        draw_regression_bonus(&DrawRegressionConfig::default(), h, a)
    }

    #[test]
    fn below_threshold_is_zero() {
        assert_eq!(bonus(3, 4), 0.0);
        assert_eq!(bonus(5, 5), 0.0);
    }

    #[test]
    fn one_long_streak_gives_bounded_bonus() {
        let b = bonus(6, 2);
        assert!(b > 0.0 && b <= 0.25);
    }

    #[test]
    fn capped_and_monotonic() {
        assert_eq!(bonus(20, 20), 0.25);
        for h in 0..30 {
            for a in 0..30 {
                let b = bonus(h, a);
                assert!((0.0..=0.25).contains(&b));
                assert!(bonus(h + 1, a) >= b);
                assert!(bonus(h, a + 1) >= b);
            }
        }
    }

    #[test]
    fn oversized_cap_is_held_at_quarter() {
        let cfg = DrawRegressionConfig {
            cap: 0.6,
            ..DrawRegressionConfig::default()
        };
        assert_eq!(draw_regression_bonus(&cfg, 30, 30), 0.25);
    }
}
