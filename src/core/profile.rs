use super::error::ProfileError;
use super::variate::normal_density;

/// Default point used by the conditional strategy when none is given.
pub const DEFAULT_SHOOT_THRESHOLD: f64 = 50.0;
/// Default misses tolerated by the conditional strategy.
pub const DEFAULT_MAX_MISSES: u32 = 2;
/// Default roll-outs per candidate action for the monte carlo strategy.
pub const DEFAULT_EV_SIMULATIONS: usize = 30;

/// Which decision policy a player uses, along with that policy's knobs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrategyKind {
    /// Never shoot.
    #[default]
    AlwaysPoint,
    /// Shoot whenever there's something to shoot at.
    AlwaysShoot,
    /// Shoot at opposing balls closer than `threshold` until the player has
    /// missed `max_misses` shots in the round.
    ConditionalShoot { threshold: f64, max_misses: u32 },
    /// Pick whichever action has the higher sampled expected board value.
    MonteCarloEv { simulations: usize },
}

impl StrategyKind {
    pub fn conditional() -> Self {
        StrategyKind::ConditionalShoot {
            threshold: DEFAULT_SHOOT_THRESHOLD,
            max_misses: DEFAULT_MAX_MISSES,
        }
    }

    pub fn monte_carlo() -> Self {
        StrategyKind::MonteCarloEv {
            simulations: DEFAULT_EV_SIMULATIONS,
        }
    }

    /// Does deciding with this strategy run simulations?
    pub fn is_monte_carlo(&self) -> bool {
        matches!(self, StrategyKind::MonteCarloEv { .. })
    }

    fn validate(&self) -> Result<(), ProfileError> {
        match *self {
            StrategyKind::ConditionalShoot { threshold, .. } => {
                check_non_negative("shoot_threshold", threshold)
            }
            StrategyKind::MonteCarloEv { simulations: 0 } => Err(ProfileError::ZeroSimulations),
            _ => Ok(()),
        }
    }
}

/// How a shot resolves, derived from a profile's hit and stay rates.
///
/// `miss + clear + stay` always sums to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotProbabilities {
    pub miss: f64,
    pub clear: f64,
    pub stay: f64,
}

impl ShotProbabilities {
    /// ```
    /// use petanque_sim::core::ShotProbabilities;
    ///
    /// let probs = ShotProbabilities::from_rates(0.6, 0.2);
    /// assert!((probs.miss - 0.4).abs() < 1e-12);
    /// assert!((probs.stay - 0.12).abs() < 1e-12);
    /// assert!((probs.clear - 0.48).abs() < 1e-12);
    /// ```
    pub fn from_rates(hit_rate: f64, stay_rate: f64) -> Self {
        let hit = hit_rate;
        let stay = hit * stay_rate;
        Self {
            miss: 1.0 - hit_rate,
            clear: hit - stay,
            stay,
        }
    }
}

/// The plain, unvalidated form of a [`PlayerProfile`].
///
/// This is what configuration files hold. Converting it into a
/// `PlayerProfile` runs validation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerProfileConfig {
    pub point_mean: f64,
    pub point_std_dev: f64,
    pub hit_rate: f64,
    pub stay_rate: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: StrategyKind,
}

impl PlayerProfileConfig {
    /// Build a config from percentage rates in 0..=100.
    pub fn from_percentages(
        point_mean: f64,
        point_std_dev: f64,
        hit_percent: f64,
        stay_percent: f64,
        strategy: StrategyKind,
    ) -> Self {
        Self {
            point_mean,
            point_std_dev,
            hit_rate: hit_percent / 100.0,
            stay_rate: stay_percent / 100.0,
            strategy,
        }
    }
}

impl Default for PlayerProfileConfig {
    fn default() -> Self {
        Self {
            point_mean: 50.0,
            point_std_dev: 20.0,
            hit_rate: 0.6,
            stay_rate: 0.2,
            strategy: StrategyKind::AlwaysPoint,
        }
    }
}

/// A validated description of how a team throws and decides.
///
/// Profiles can only be created through validation, so the engine never
/// checks them again mid simulation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "PlayerProfileConfig", into = "PlayerProfileConfig")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerProfile {
    point_mean: f64,
    point_std_dev: f64,
    hit_rate: f64,
    stay_rate: f64,
    strategy: StrategyKind,
}

impl PlayerProfile {
    pub fn builder() -> PlayerProfileBuilder {
        PlayerProfileBuilder::default()
    }

    pub fn point_mean(&self) -> f64 {
        self.point_mean
    }

    pub fn point_std_dev(&self) -> f64 {
        self.point_std_dev
    }

    pub fn hit_rate(&self) -> f64 {
        self.hit_rate
    }

    pub fn stay_rate(&self) -> f64 {
        self.stay_rate
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn shot_probabilities(&self) -> ShotProbabilities {
        ShotProbabilities::from_rates(self.hit_rate, self.stay_rate)
    }

    /// Probability density of a pointed ball landing `x` units from the jack.
    pub fn distance_density(&self, x: f64) -> f64 {
        normal_density(x, self.point_mean, self.point_std_dev)
    }

    /// Sample the throw density from zero to `max` every `step` units, for
    /// plotting a profile's pointing accuracy.
    pub fn density_curve(&self, max: f64, step: f64) -> Vec<(f64, f64)> {
        if step <= 0.0 || max < 0.0 {
            return vec![];
        }
        let steps = (max / step).floor() as usize;
        (0..=steps)
            .map(|i| {
                let x = i as f64 * step;
                (x, self.distance_density(x))
            })
            .collect()
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        let config = PlayerProfileConfig::default();
        Self {
            point_mean: config.point_mean,
            point_std_dev: config.point_std_dev,
            hit_rate: config.hit_rate,
            stay_rate: config.stay_rate,
            strategy: config.strategy,
        }
    }
}

impl TryFrom<PlayerProfileConfig> for PlayerProfile {
    type Error = ProfileError;

    fn try_from(config: PlayerProfileConfig) -> Result<Self, Self::Error> {
        check_non_negative("point_mean", config.point_mean)?;
        check_positive("point_std_dev", config.point_std_dev)?;
        check_rate("hit_rate", config.hit_rate)?;
        check_rate("stay_rate", config.stay_rate)?;
        config.strategy.validate()?;

        Ok(Self {
            point_mean: config.point_mean,
            point_std_dev: config.point_std_dev,
            hit_rate: config.hit_rate,
            stay_rate: config.stay_rate,
            strategy: config.strategy,
        })
    }
}

impl From<PlayerProfile> for PlayerProfileConfig {
    fn from(profile: PlayerProfile) -> Self {
        Self {
            point_mean: profile.point_mean,
            point_std_dev: profile.point_std_dev,
            hit_rate: profile.hit_rate,
            stay_rate: profile.stay_rate,
            strategy: profile.strategy,
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ProfileError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProfileError::NotFinite { field })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ProfileError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ProfileError::Negative { field, value });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ProfileError> {
    check_finite(field, value)?;
    if value <= 0.0 {
        return Err(ProfileError::NonPositive { field, value });
    }
    Ok(())
}

fn check_rate(field: &'static str, value: f64) -> Result<(), ProfileError> {
    check_finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ProfileError::OutOfRange { field, value });
    }
    Ok(())
}

/// # PlayerProfileBuilder
///
/// Starts from the default profile (mean 50, standard deviation 20, 60% hit
/// rate, 20% stay rate, always pointing). Each setter replaces one value and
/// `build` validates the result.
///
/// ## Examples
///
/// ```
/// use petanque_sim::core::{PlayerProfile, StrategyKind};
///
/// let profile = PlayerProfile::builder()
///     .point_mean(35.0)
///     .hit_rate(0.8)
///     .strategy(StrategyKind::AlwaysShoot)
///     .build()
///     .unwrap();
/// assert_eq!(35.0, profile.point_mean());
/// ```
///
/// Invalid values are reported with the field name:
///
/// ```
/// use petanque_sim::core::{PlayerProfile, ProfileError};
///
/// let err = PlayerProfile::builder().stay_rate(1.5).build().unwrap_err();
/// assert_eq!(
///     ProfileError::OutOfRange {
///         field: "stay_rate",
///         value: 1.5
///     },
///     err
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlayerProfileBuilder {
    config: PlayerProfileConfig,
}

impl PlayerProfileBuilder {
    pub fn point_mean(mut self, point_mean: f64) -> Self {
        self.config.point_mean = point_mean;
        self
    }

    pub fn point_std_dev(mut self, point_std_dev: f64) -> Self {
        self.config.point_std_dev = point_std_dev;
        self
    }

    pub fn hit_rate(mut self, hit_rate: f64) -> Self {
        self.config.hit_rate = hit_rate;
        self
    }

    pub fn stay_rate(mut self, stay_rate: f64) -> Self {
        self.config.stay_rate = stay_rate;
        self
    }

    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn build(self) -> Result<PlayerProfile, ProfileError> {
        PlayerProfile::try_from(self.config)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_probabilities_sum_to_one() {
        let steps = 20;
        for h in 0..=steps {
            for s in 0..=steps {
                let probs = ShotProbabilities::from_rates(
                    h as f64 / steps as f64,
                    s as f64 / steps as f64,
                );
                assert_relative_eq!(1.0, probs.miss + probs.clear + probs.stay, epsilon = 1e-12);
                assert!(probs.miss >= 0.0 && probs.clear >= -1e-12 && probs.stay >= 0.0);
            }
        }
    }

    #[test]
    fn test_rejects_negative_mean() {
        let err = PlayerProfile::builder().point_mean(-1.0).build();
        assert_eq!(
            Err(ProfileError::Negative {
                field: "point_mean",
                value: -1.0
            }),
            err
        );
    }

    #[test]
    fn test_rejects_zero_std_dev() {
        let err = PlayerProfile::builder().point_std_dev(0.0).build();
        assert_eq!(
            Err(ProfileError::NonPositive {
                field: "point_std_dev",
                value: 0.0
            }),
            err
        );
    }

    #[test]
    fn test_rejects_bad_rates() {
        assert!(matches!(
            PlayerProfile::builder().hit_rate(-0.1).build(),
            Err(ProfileError::OutOfRange {
                field: "hit_rate",
                ..
            })
        ));
        assert!(matches!(
            PlayerProfile::builder().hit_rate(f64::NAN).build(),
            Err(ProfileError::NotFinite { field: "hit_rate" })
        ));
    }

    #[test]
    fn test_rejects_bad_strategy_params() {
        assert_eq!(
            Err(ProfileError::ZeroSimulations),
            PlayerProfile::builder()
                .strategy(StrategyKind::MonteCarloEv { simulations: 0 })
                .build()
        );
        assert!(matches!(
            PlayerProfile::builder()
                .strategy(StrategyKind::ConditionalShoot {
                    threshold: -5.0,
                    max_misses: 1
                })
                .build(),
            Err(ProfileError::Negative {
                field: "shoot_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_from_percentages() {
        let config =
            PlayerProfileConfig::from_percentages(50.0, 20.0, 60.0, 20.0, StrategyKind::AlwaysShoot);
        let profile = PlayerProfile::try_from(config).unwrap();
        assert_relative_eq!(0.6, profile.hit_rate());
        assert_relative_eq!(0.2, profile.stay_rate());
    }

    #[test]
    fn test_density_curve() {
        let profile = PlayerProfile::default();
        let curve = profile.density_curve(150.0, 5.0);
        assert_eq!(31, curve.len());
        assert_relative_eq!(0.0, curve[0].0);
        assert_relative_eq!(150.0, curve[30].0);
        let peak = curve
            .iter()
            .max_by(|l, r| l.1.total_cmp(&r.1))
            .unwrap();
        assert_relative_eq!(50.0, peak.0);
        assert!(profile.density_curve(150.0, 0.0).is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let good = r#"{
            "point_mean": 40.0,
            "point_std_dev": 10.0,
            "hit_rate": 0.5,
            "stay_rate": 0.1,
            "strategy": {"kind": "conditional_shoot", "threshold": 30.0, "max_misses": 1}
        }"#;
        let profile: PlayerProfile = serde_json::from_str(good).unwrap();
        assert_eq!(
            StrategyKind::ConditionalShoot {
                threshold: 30.0,
                max_misses: 1
            },
            profile.strategy()
        );

        let bad = r#"{"point_mean": 40.0, "point_std_dev": 10.0, "hit_rate": 2.0, "stay_rate": 0.1}"#;
        let err = serde_json::from_str::<PlayerProfile>(bad).unwrap_err();
        assert!(err.to_string().contains("hit_rate"));
    }
}
