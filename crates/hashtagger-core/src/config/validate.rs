//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.data.text_column.trim().is_empty() || self.data.tags_column.trim().is_empty() {
            return Err(invalid("data.text_column and data.tags_column must be set"));
        }
        if self.augmentation.target_count == 0 {
            return Err(invalid("augmentation.target_count must be > 0"));
        }
        if self.augmentation.variants_per_record == 0 {
            return Err(invalid("augmentation.variants_per_record must be > 0"));
        }
        if self.augmentation.replacements == 0 {
            return Err(invalid("augmentation.replacements must be > 0"));
        }
        if self.features.max_features == 0 {
            return Err(invalid("features.max_features must be > 0"));
        }
        if self.features.ngram_min == 0 || self.features.ngram_min > self.features.ngram_max {
            return Err(invalid(
                "features.ngram_min must be >= 1 and <= features.ngram_max",
            ));
        }
        if self.training.svc_c <= 0.0 || self.training.lr_c <= 0.0 {
            return Err(invalid("training.svc_c and training.lr_c must be > 0"));
        }
        if self.training.nb_alpha <= 0.0 {
            return Err(invalid("training.nb_alpha must be > 0"));
        }
        if self.training.tolerance <= 0.0 {
            return Err(invalid("training.tolerance must be > 0"));
        }
        if self.training.svc_max_iter == 0 || self.training.lr_max_iter == 0 {
            return Err(invalid(
                "training.svc_max_iter and training.lr_max_iter must be > 0",
            ));
        }
        if self.suggest.top_k == 0 {
            return Err(invalid("suggest.top_k must be > 0"));
        }
        Ok(())
    }
}
