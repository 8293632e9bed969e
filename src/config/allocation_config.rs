// ==========================================
// 鞋业生产订单系统 - 分批配置
// ==========================================
// 批量容量 / 轮次数 / 尺码列 / 各产品类型的尺码曲线
// 以显式结构传入分批引擎，测试可按需覆写
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::ProductType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 默认每批双数
pub const DEFAULT_LOT_CAPACITY: u32 = 20;

/// 默认轮次数（轮次 1..=5）
pub const DEFAULT_ROUND_COUNT: u32 = 5;

/// 默认尺码列（批次表的列顺序）
pub const DEFAULT_SIZE_LABELS: [&str; 12] = [
    "4", "4x", "5", "5x", "6", "7", "7x", "8x", "9x", "10", "11", "12",
];

// ==========================================
// CurveStep - 尺码曲线中的一步
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveStep {
    /// 尺码标签
    pub size: String,
    /// 该尺码每轮预分配的批次数
    pub lots: u32,
}

// ==========================================
// SizeCurve - 尺码曲线
// ==========================================
// 有序的 (尺码, 批次数) 序列，每轮从头遍历
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeCurve {
    steps: Vec<CurveStep>,
}

impl SizeCurve {
    /// 由 (尺码, 批次数) 序列构造
    pub fn new<S: Into<String>>(steps: impl IntoIterator<Item = (S, u32)>) -> Self {
        Self {
            steps: steps
                .into_iter()
                .map(|(size, lots)| CurveStep {
                    size: size.into(),
                    lots,
                })
                .collect(),
        }
    }

    /// 由平行的尺码列表与批次数列表构造
    ///
    /// # 返回
    /// - Err(ConfigError::CurveLengthMismatch): 两个列表长度不一致
    pub fn from_parallel<S: AsRef<str>>(sizes: &[S], lots_per_size: &[u32]) -> ConfigResult<Self> {
        if sizes.len() != lots_per_size.len() {
            return Err(ConfigError::CurveLengthMismatch {
                sizes: sizes.len(),
                counts: lots_per_size.len(),
            });
        }

        Ok(Self::new(
            sizes
                .iter()
                .map(|s| s.as_ref().to_string())
                .zip(lots_per_size.iter().copied()),
        ))
    }

    pub fn steps(&self) -> &[CurveStep] {
        &self.steps
    }

    /// 每轮可分配的批次数
    pub fn slots_per_round(&self) -> u32 {
        self.steps.iter().map(|s| s.lots).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots_per_round() == 0
    }
}

// ==========================================
// AllocationConfig - 分批配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub lot_capacity: u32,
    pub round_count: u32,
    pub size_labels: Vec<String>,
    pub curves: BTreeMap<ProductType, SizeCurve>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        let mut curves = BTreeMap::new();
        curves.insert(
            ProductType::Men,
            SizeCurve::new([
                ("7", 1),
                ("7x", 1),
                ("8x", 2),
                ("9x", 3),
                ("10", 2),
                ("11", 2),
                ("12", 1),
            ]),
        );
        curves.insert(
            ProductType::Women,
            SizeCurve::new([
                ("4", 1),
                ("4x", 1),
                ("5", 3),
                ("6", 3),
                ("7", 2),
                ("7x", 1),
                ("8x", 1),
            ]),
        );

        Self {
            lot_capacity: DEFAULT_LOT_CAPACITY,
            round_count: DEFAULT_ROUND_COUNT,
            size_labels: DEFAULT_SIZE_LABELS.iter().map(|s| s.to_string()).collect(),
            curves,
        }
    }
}

impl AllocationConfig {
    /// 获取产品类型对应的尺码曲线
    pub fn curve(&self, product_type: ProductType) -> ConfigResult<&SizeCurve> {
        self.curves
            .get(&product_type)
            .ok_or(ConfigError::MissingCurve(product_type))
    }

    /// 轮次范围 1..=round_count
    pub fn rounds(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.round_count
    }

    /// 产能上限 = 轮次数 × 批量 × 每轮批次数
    pub fn capacity_ceiling(&self, product_type: ProductType) -> ConfigResult<u64> {
        let curve = self.curve(product_type)?;
        Ok(self.round_count as u64 * self.lot_capacity as u64 * curve.slots_per_round() as u64)
    }

    /// 校验配置完整性
    ///
    /// 规则:
    /// 1) 批量 > 0、轮次数 > 0
    /// 2) 每个产品类型都有非空曲线
    /// 3) 曲线中的尺码必须出现在尺码列中
    pub fn validate(&self) -> ConfigResult<()> {
        if self.lot_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "lot_capacity".to_string(),
                message: "批量必须大于0".to_string(),
            });
        }
        if self.round_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "round_count".to_string(),
                message: "轮次数必须大于0".to_string(),
            });
        }

        for product_type in ProductType::ALL {
            let curve = self.curve(product_type)?;
            if curve.is_empty() {
                return Err(ConfigError::EmptyCurve(product_type));
            }
            for step in curve.steps() {
                if !self.size_labels.iter().any(|s| s == &step.size) {
                    return Err(ConfigError::UnknownSize {
                        product_type,
                        size: step.size.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AllocationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.curve(ProductType::Men).unwrap().slots_per_round(), 12);
        assert_eq!(config.curve(ProductType::Women).unwrap().slots_per_round(), 12);
        assert_eq!(config.capacity_ceiling(ProductType::Men).unwrap(), 1200);
    }

    #[test]
    fn test_from_parallel_rejects_mismatched_lengths() {
        let result = SizeCurve::from_parallel(&["7", "8"], &[1]);
        match result {
            Err(ConfigError::CurveLengthMismatch { sizes, counts }) => {
                assert_eq!(sizes, 2);
                assert_eq!(counts, 1);
            }
            other => panic!("Expected CurveLengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unknown_size() {
        let mut config = AllocationConfig::default();
        config
            .curves
            .insert(ProductType::Men, SizeCurve::new([("13", 1)]));

        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownSize { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = AllocationConfig {
            lot_capacity: 0,
            ..AllocationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_curve_json_shape() {
        let curve = SizeCurve::new([("7", 1), ("8x", 2)]);
        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(json, r#"[{"size":"7","lots":1},{"size":"8x","lots":2}]"#);
    }
}
