// ==========================================
// 鞋业生产订单系统 - 命令行入口
// ==========================================
// 用法:
//   footwear-lot-planner init
//   footwear-lot-planner create <客户> <生产单号> <总双数> <MEN|WOMEN>
//   footwear-lot-planner list [筛选]
//   footwear-lot-planner show <order_id> [--json]
//   footwear-lot-planner export <order_id> <path> [--long]
//   footwear-lot-planner apply <order_id> <csv>
//   footwear-lot-planner delete <order_id>
//   footwear-lot-planner config [set <key> <value>]
// 数据库路径: FOOTWEAR_LOT_PLANNER_DB_PATH 或用户数据目录
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use footwear_lot_planner::api::{OrderDetail, OrderForm};
use footwear_lot_planner::app::{get_default_db_path, AppState};
use footwear_lot_planner::domain::types::ProductType;
use footwear_lot_planner::exporter::ExportLayout;
use footwear_lot_planner::logging;

const USAGE: &str = "\
用法:
  footwear-lot-planner init
  footwear-lot-planner create <client> <order_no> <total_pairs> <MEN|WOMEN>
  footwear-lot-planner list [filter]
  footwear-lot-planner show <order_id> [--json]
  footwear-lot-planner export <order_id> <path> [--long]
  footwear-lot-planner apply <order_id> <csv>
  footwear-lot-planner delete <order_id>
  footwear-lot-planner config [set <key> <value>]";

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[1..];

    let db_path = get_default_db_path();
    tracing::info!(
        "{} v{} 使用数据库: {}",
        footwear_lot_planner::APP_NAME,
        footwear_lot_planner::VERSION,
        db_path
    );

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "init" => {
            println!("数据库已就绪: {}", state.db_path);
        }
        "create" => cmd_create(&state, rest)?,
        "list" => cmd_list(&state, rest)?,
        "show" => cmd_show(&state, rest)?,
        "export" => cmd_export(&state, rest)?,
        "apply" => {
            let order_id = parse_order_id(rest.first())?;
            let csv_path = PathBuf::from(arg(rest, 1, "csv")?);
            let outcome = state
                .order_api
                .apply_csv_sheet(order_id, &csv_path)
                .with_context(|| format!("应用 CSV 失败: {}", csv_path.display()))?;
            println!(
                "批次表已保存: 更新 {} 行, 新增 {} 行",
                outcome.updated, outcome.inserted
            );
        }
        "delete" => {
            let order_id = parse_order_id(rest.first())?;
            state.order_api.delete_order(order_id)?;
            println!("生产单 {} 已删除", order_id);
        }
        "config" => cmd_config(&state, rest)?,
        "help" | "--help" | "-h" => println!("{}", USAGE),
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}

fn arg<'a>(rest: &'a [String], idx: usize, name: &str) -> Result<&'a str> {
    rest.get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("缺少参数 <{}>\n{}", name, USAGE))
}

fn parse_order_id(raw: Option<&String>) -> Result<i64> {
    let raw = raw.ok_or_else(|| anyhow!("缺少参数 <order_id>\n{}", USAGE))?;
    raw.trim()
        .parse()
        .with_context(|| format!("order_id 必须为整数: {:?}", raw))
}

fn cmd_create(state: &AppState, rest: &[String]) -> Result<()> {
    let product_type: ProductType = arg(rest, 3, "MEN|WOMEN")?
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let form = OrderForm {
        client_name: arg(rest, 0, "client")?.to_string(),
        order_no: arg(rest, 1, "order_no")?.to_string(),
        total_pairs: arg(rest, 2, "total_pairs")?.to_string(),
        product_type,
    };

    let resp = state.order_api.create_order(&form)?;
    println!(
        "生产单已创建: id={} 单号={} 客户={} 批次数={} 已分配={}双",
        resp.order.order_id,
        resp.order.order_no,
        resp.order.client_name,
        resp.lot_count,
        resp.allocated_pairs
    );
    if resp.unplaced_pairs > 0 {
        println!(
            "警告: {} 双超出 {} 轮容量，未分配",
            resp.unplaced_pairs, state.allocation_config.round_count
        );
    }
    Ok(())
}

fn cmd_list(state: &AppState, rest: &[String]) -> Result<()> {
    let filter = rest.first().map(String::as_str).unwrap_or("");
    let orders = state.order_api.list_orders(filter)?;
    println!("{:<8}{:<12}{:<18}{:<30}{:>8}  类型", "ID", "单号", "创建时间", "客户", "总双数");
    for o in &orders {
        println!(
            "{:<8}{:<12}{:<18}{:<30}{:>8}  {}",
            o.order_id, o.order_no, o.created_at, o.client_name, o.total_pairs, o.product_type
        );
    }
    println!("共 {} 条", orders.len());
    Ok(())
}

fn cmd_show(state: &AppState, rest: &[String]) -> Result<()> {
    let order_id = parse_order_id(rest.first())?;
    let detail = state.order_api.get_order_detail(order_id)?;

    if rest.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print_detail(&detail);
    }
    Ok(())
}

fn print_detail(detail: &OrderDetail) {
    let order = &detail.order;
    let sheet = &detail.sheet;
    println!(
        "生产单 {} | 客户 {} | 创建 {} | 需求 {} 双 | {}",
        order.order_no,
        order.client_name,
        order.created_at_display(),
        order.total_pairs,
        order.product_type
    );

    for round in &sheet.rounds {
        println!();
        println!("== 第 {} 轮 ==", round.round);
        let mut header = format!("{:<16}", "批次");
        for label in &sheet.size_labels {
            header.push_str(&format!("{:>5}", label));
        }
        header.push_str(&format!("{:>7}  状态", "合计"));
        println!("{}", header);

        for lot in &round.lots {
            let mut line = format!("{:<16}", sheet.lot_code(round.round, lot.lot_number));
            for q in &lot.quantities {
                line.push_str(&format!("{:>5}", q));
            }
            line.push_str(&format!("{:>7}  {}", lot.total(), sheet.lot_status(lot)));
            println!("{}", line);
        }

        let mut totals = format!("{:<16}", "轮次合计");
        for t in round.size_totals(sheet.size_labels.len()) {
            totals.push_str(&format!("{:>5}", t));
        }
        totals.push_str(&format!("{:>7}", round.total()));
        println!("{}", totals);
    }

    println!();
    println!("总计: {} 双", detail.grand_total);
    for v in &detail.violations {
        println!(
            "待补齐: {} 合计 {} 双 (需 {} 双)",
            sheet.lot_code(v.round, v.lot_number),
            v.actual,
            v.expected
        );
    }
}

fn cmd_export(state: &AppState, rest: &[String]) -> Result<()> {
    let order_id = parse_order_id(rest.first())?;
    let path = PathBuf::from(arg(rest, 1, "path")?);
    let layout = if rest.iter().any(|a| a == "--long") {
        ExportLayout::Long
    } else {
        ExportLayout::Grid
    };

    state
        .order_api
        .export_order_csv(order_id, &path, layout)
        .with_context(|| format!("导出失败: {}", path.display()))?;
    println!("已导出: {}", path.display());
    Ok(())
}

fn cmd_config(state: &AppState, rest: &[String]) -> Result<()> {
    match rest.first().map(String::as_str) {
        None => {
            println!("{}", serde_json::to_string_pretty(&state.allocation_config)?);
            println!("覆写项: {}", state.config_manager.get_config_snapshot()?);
        }
        Some("set") => {
            let key = arg(rest, 1, "key")?;
            let value = arg(rest, 2, "value")?;
            state.config_manager.set_config_value(key, value)?;
            // 写入后立即校验，拒绝无效组合
            state
                .config_manager
                .load_allocation_config()
                .context("配置已写入但校验失败，请修正后重试")?;
            println!("配置已更新: {} = {}", key, value);
        }
        Some(other) => bail!("未知 config 子命令: {}\n{}", other, USAGE),
    }
    Ok(())
}
