// ==========================================
// 鞋业生产订单系统 - 批次合计校验
// ==========================================
// 规则: 保存前每个批次的尺码合计必须恰好等于批量
// 顺序: 轮次升序 → 批次号升序，返回第一个违规
// ==========================================

use crate::domain::lot_sheet::LotSheet;
use serde::{Deserialize, Serialize};

/// 批次合计违规
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotTotalViolation {
    pub round: u32,
    pub lot_number: u32,
    pub actual: u32,
    pub expected: u32,
}

// ==========================================
// LotSheetValidator - 批次表校验器
// ==========================================
pub struct LotSheetValidator;

impl LotSheetValidator {
    /// 校验整张批次表
    ///
    /// # 返回
    /// - Ok(()): 全部批次合计等于批量
    /// - Err(LotTotalViolation): 第一个不满足的批次
    pub fn validate(sheet: &LotSheet) -> Result<(), LotTotalViolation> {
        let mut rounds: Vec<_> = sheet.rounds.iter().collect();
        rounds.sort_by_key(|r| r.round);

        for round in rounds {
            let mut lots: Vec<_> = round.lots.iter().collect();
            lots.sort_by_key(|l| l.lot_number);

            for lot in lots {
                let actual = lot.total();
                if actual != sheet.lot_capacity {
                    return Err(LotTotalViolation {
                        round: round.round,
                        lot_number: lot.lot_number,
                        actual,
                        expected: sheet.lot_capacity,
                    });
                }
            }
        }

        Ok(())
    }

    /// 收集全部违规（用于界面高亮，不影响保存判定）
    pub fn collect_violations(sheet: &LotSheet) -> Vec<LotTotalViolation> {
        let mut violations = Vec::new();
        for round in &sheet.rounds {
            for lot in &round.lots {
                let actual = lot.total();
                if actual != sheet.lot_capacity {
                    violations.push(LotTotalViolation {
                        round: round.round,
                        lot_number: lot.lot_number,
                        actual,
                        expected: sheet.lot_capacity,
                    });
                }
            }
        }
        violations
    }
}
