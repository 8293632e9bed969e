// ==========================================
// 鞋业生产订单系统 - 批次表（按轮次的尺码网格）
// ==========================================
// 职责: 由批次行构建可编辑的网格视图
// 行合计 / 尺码合计 / 轮次合计 / 总计 / 批次状态 均为按需派生，不落库
// ==========================================

use crate::config::allocation_config::AllocationConfig;
use crate::domain::lot::LotCell;
use crate::domain::types::LotStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 批次表编辑错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetEditError {
    #[error("轮次{round}中不存在批次{lot_number}")]
    UnknownLot { round: u32, lot_number: u32 },

    #[error("批次表中不存在尺码列: {0}")]
    UnknownSize(String),
}

// ==========================================
// LotRow - 批次行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotRow {
    pub lot_number: u32,
    /// 各尺码双数，与 LotSheet::size_labels 一一对应
    pub quantities: Vec<u32>,
}

impl LotRow {
    /// 批次合计
    pub fn total(&self) -> u32 {
        self.quantities.iter().fold(0, |acc, q| acc.saturating_add(*q))
    }

    /// 非零尺码拼接（如 "7/7x"）
    pub fn sizes_label(&self, size_labels: &[String]) -> String {
        self.quantities
            .iter()
            .zip(size_labels)
            .filter(|(qty, _)| **qty > 0)
            .map(|(_, label)| label.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

// ==========================================
// RoundSheet - 单轮批次表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSheet {
    pub round: u32,
    /// 按批次号升序
    pub lots: Vec<LotRow>,
}

impl RoundSheet {
    /// 各尺码合计（"批次合计"行）
    pub fn size_totals(&self, width: usize) -> Vec<u32> {
        let mut totals = vec![0u32; width];
        for lot in &self.lots {
            for (total, qty) in totals.iter_mut().zip(&lot.quantities) {
                *total = total.saturating_add(*qty);
            }
        }
        totals
    }

    /// 本轮合计
    pub fn total(&self) -> u32 {
        self.lots
            .iter()
            .fold(0, |acc, lot| acc.saturating_add(lot.total()))
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}

// ==========================================
// LotSheet - 生产单批次表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSheet {
    pub order_id: i64,
    pub lot_capacity: u32,
    pub size_labels: Vec<String>,
    /// 轮次 1..=round_count 始终存在（可能为空）
    pub rounds: Vec<RoundSheet>,
}

impl LotSheet {
    /// 由批次单元格构建批次表
    ///
    /// 尺码列以配置为准；库中出现但配置未定义的尺码按首次出现顺序追加到末尾
    pub fn from_cells(order_id: i64, config: &AllocationConfig, cells: &[LotCell]) -> Self {
        let mut size_labels = config.size_labels.clone();
        for cell in cells {
            if !size_labels.contains(&cell.size_label) {
                size_labels.push(cell.size_label.clone());
            }
        }
        let width = size_labels.len();

        let mut grid: BTreeMap<u32, BTreeMap<u32, Vec<u32>>> =
            config.rounds().map(|r| (r, BTreeMap::new())).collect();

        for cell in cells {
            // size_labels 已包含所有出现过的尺码
            let col = size_labels
                .iter()
                .position(|s| s == &cell.size_label)
                .unwrap_or(width - 1);
            let row = grid
                .entry(cell.round)
                .or_default()
                .entry(cell.lot_number)
                .or_insert_with(|| vec![0; width]);
            row[col] = row[col].saturating_add(cell.quantity);
        }

        let rounds = grid
            .into_iter()
            .map(|(round, lots)| RoundSheet {
                round,
                lots: lots
                    .into_iter()
                    .map(|(lot_number, quantities)| LotRow {
                        lot_number,
                        quantities,
                    })
                    .collect(),
            })
            .collect();

        Self {
            order_id,
            lot_capacity: config.lot_capacity,
            size_labels,
            rounds,
        }
    }

    pub fn size_index(&self, size_label: &str) -> Option<usize> {
        self.size_labels.iter().position(|s| s == size_label)
    }

    pub fn round(&self, round: u32) -> Option<&RoundSheet> {
        self.rounds.iter().find(|r| r.round == round)
    }

    pub fn lot(&self, round: u32, lot_number: u32) -> Option<&LotRow> {
        self.round(round)?
            .lots
            .iter()
            .find(|l| l.lot_number == lot_number)
    }

    /// 读取单元格双数（批次或尺码不存在时为 None）
    pub fn quantity(&self, round: u32, lot_number: u32, size_label: &str) -> Option<u32> {
        let col = self.size_index(size_label)?;
        self.lot(round, lot_number)
            .and_then(|l| l.quantities.get(col).copied())
    }

    /// 修改单元格双数
    pub fn set_quantity(
        &mut self,
        round: u32,
        lot_number: u32,
        size_label: &str,
        quantity: u32,
    ) -> Result<(), SheetEditError> {
        let col = self
            .size_index(size_label)
            .ok_or_else(|| SheetEditError::UnknownSize(size_label.to_string()))?;

        let row = self
            .rounds
            .iter_mut()
            .find(|r| r.round == round)
            .and_then(|r| r.lots.iter_mut().find(|l| l.lot_number == lot_number))
            .ok_or(SheetEditError::UnknownLot { round, lot_number })?;

        let slot = row
            .quantities
            .get_mut(col)
            .ok_or_else(|| SheetEditError::UnknownSize(size_label.to_string()))?;
        *slot = quantity;
        Ok(())
    }

    /// 所有单元格置零（批次结构保持不变）
    pub fn clear_quantities(&mut self) {
        for round in &mut self.rounds {
            for lot in &mut round.lots {
                lot.quantities.iter_mut().for_each(|q| *q = 0);
            }
        }
    }

    /// 批次状态（派生）
    pub fn lot_status(&self, lot: &LotRow) -> LotStatus {
        LotStatus::derive(lot.total(), self.lot_capacity)
    }

    /// 批次编码，格式 ID_{生产单}_{轮次}_{批次号}
    pub fn lot_code(&self, round: u32, lot_number: u32) -> String {
        format!("ID_{}_{}_{}", self.order_id, round, lot_number)
    }

    /// 所有轮次总计
    pub fn grand_total(&self) -> u32 {
        self.rounds
            .iter()
            .fold(0, |acc, round| acc.saturating_add(round.total()))
    }

    /// 批次总数
    pub fn lot_count(&self) -> usize {
        self.rounds.iter().map(|r| r.lots.len()).sum()
    }

    /// 展开为单元格（含 0），按轮次、批次号、尺码列顺序
    pub fn cells(&self) -> Vec<LotCell> {
        let mut cells = Vec::new();
        for round in &self.rounds {
            for lot in &round.lots {
                for (label, qty) in self.size_labels.iter().zip(&lot.quantities) {
                    cells.push(LotCell::new(round.round, lot.lot_number, label.clone(), *qty));
                }
            }
        }
        cells
    }

    /// 展开为非零单元格
    pub fn non_zero_cells(&self) -> Vec<LotCell> {
        self.cells().into_iter().filter(|c| c.quantity > 0).collect()
    }
}
