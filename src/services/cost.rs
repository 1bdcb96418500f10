//! Cost estimation

use crate::config::PricingConfig;
use crate::models::{CostEstimate, TokenUsage};

/// Decimal places kept when a cost is presented
pub const COST_DECIMALS: i32 = 5;

/// `input_tokens * price_in + output_tokens * price_out`, unrounded
pub fn cost(input_tokens: u64, output_tokens: u64, pricing: &PricingConfig) -> f64 {
    input_tokens as f64 * pricing.input_per_token + output_tokens as f64 * pricing.output_per_token
}

/// Round to 5 decimals, halves away from zero
pub fn round_usd(usd: f64) -> f64 {
    let factor = 10f64.powi(COST_DECIMALS);
    (usd * factor).round() / factor
}

/// Accumulates the calls charged to a query
#[derive(Debug, Clone)]
pub struct CostEstimator {
    pricing: PricingConfig,
    charged: TokenUsage,
}

impl CostEstimator {
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing,
            charged: TokenUsage::default(),
        }
    }

    pub fn charge(&mut self, usage: TokenUsage) -> &mut Self {
        self.charged = self.charged.combine(usage);
        self
    }

    pub fn estimate(&self) -> CostEstimate {
        CostEstimate {
            input_tokens: self.charged.prompt_tokens,
            output_tokens: self.charged.completion_tokens,
            usd: cost(
                self.charged.prompt_tokens,
                self.charged.completion_tokens,
                &self.pricing,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_cost_is_linear_in_tokens() {
        let pricing = PricingConfig::default();
        assert!(close(cost(1000, 500, &pricing), 0.025));
        assert!(close(cost(0, 0, &pricing), 0.0));
        assert!(close(cost(1, 0, &pricing), 0.00001));
        assert!(close(cost(0, 1, &pricing), 0.00003));
        assert!(close(
            cost(2000, 1000, &pricing),
            cost(1000, 500, &pricing) * 2.0
        ));
    }

    #[test]
    fn test_rounding_to_five_decimals() {
        assert_eq!(round_usd(0.123456), 0.12346);
        assert_eq!(round_usd(0.123454), 0.12345);
        assert_eq!(round_usd(0.025), 0.025);
        assert_eq!(round_usd(0.0), 0.0);
    }

    #[test]
    fn test_estimator_accumulates_charged_calls() {
        let mut estimator = CostEstimator::new(PricingConfig::default());
        estimator
            .charge(TokenUsage { prompt_tokens: 600, completion_tokens: 300 })
            .charge(TokenUsage { prompt_tokens: 400, completion_tokens: 200 });

        let estimate = estimator.estimate();
        assert_eq!(estimate.input_tokens, 1000);
        assert_eq!(estimate.output_tokens, 500);
        assert!(close(estimate.usd, 0.025));
    }

    #[test]
    fn test_estimator_handles_provider_maximum_usage() {
        let mut estimator = CostEstimator::new(PricingConfig::default());
        estimator
            .charge(TokenUsage { prompt_tokens: u64::from(u32::MAX), completion_tokens: 0 })
            .charge(TokenUsage { prompt_tokens: 1, completion_tokens: 0 });

        let estimate = estimator.estimate();
        assert_eq!(estimate.input_tokens, u64::from(u32::MAX) + 1);
        assert!(close(estimate.usd, (u64::from(u32::MAX) + 1) as f64 * 0.00001));

        estimator.charge(TokenUsage { prompt_tokens: u64::MAX, completion_tokens: 0 });
        assert_eq!(estimator.estimate().input_tokens, u64::MAX);
    }
}
