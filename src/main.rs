// ==========================================
// 考场座位分配系统 - 命令行入口
// ==========================================
// 用法:
//   exam-seating allocate <exam_a> <exam_b>
//   exam-seating duty [YYYY-MM-DD]
//   exam-seating seat <usn>
//   exam-seating room <room_id>
//   exam-seating report
//   exam-seating runs [limit]
//   exam-seating config list | config set <key> <value>
// 结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use exam_seating::app::{get_default_db_path, AppState};
use serde::Serialize;

const USAGE: &str = "\
用法:
  exam-seating allocate <exam_a> <exam_b>   为一对同场考试分配座位
  exam-seating duty [YYYY-MM-DD]            排监考（默认今天）
  exam-seating seat <usn>                   查询学生座位
  exam-seating room <room_id>               考场座位图
  exam-seating report                       考场占用统计
  exam-seating runs [limit]                 最近运行日志（默认 20 条）
  exam-seating config list                  查看全局配置
  exam-seating config set <key> <value>     写入全局配置";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    exam_seating::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let db_path = get_default_db_path();
    tracing::info!(version = exam_seating::VERSION, db_path = %db_path, "{}", exam_seating::APP_NAME);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let api = &state.seating_api;

    match command.as_str() {
        "allocate" => {
            let exam_a = parse_arg::<i64>(&args, 1, "exam_a")?;
            let exam_b = parse_arg::<i64>(&args, 2, "exam_b")?;
            print_json(&api.allocate(exam_a, exam_b).await?)
        }
        "duty" => {
            let date = match args.get(1) {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .with_context(|| format!("日期格式应为 YYYY-MM-DD: {}", raw))?,
                None => Local::now().date_naive(),
            };
            print_json(&api.assign_duty(date).await?)
        }
        "seat" => {
            let usn = args.get(1).ok_or_else(|| anyhow!("缺少参数: usn"))?;
            match api.find_student_seat(usn)? {
                Some(seat) => print_json(&seat),
                None => {
                    println!("学号 {} 尚未分配座位", usn.trim());
                    Ok(())
                }
            }
        }
        "room" => {
            let room_id = parse_arg::<i64>(&args, 1, "room_id")?;
            print_json(&api.room_seat_map(room_id)?)
        }
        "report" => print_json(&api.room_occupancy_report().await?),
        "runs" => {
            let limit = match args.get(1) {
                Some(_) => parse_arg::<usize>(&args, 1, "limit")?,
                None => 20,
            };
            print_json(&api.list_recent_runs(limit)?)
        }
        "config" => match args.get(1).map(String::as_str) {
            Some("list") => print_json(
                &state
                    .config_manager
                    .get_config_snapshot()
                    .map_err(|e| anyhow!(e.to_string()))?,
            ),
            Some("set") => {
                let key = args.get(2).ok_or_else(|| anyhow!("缺少参数: key"))?;
                let value = args.get(3).ok_or_else(|| anyhow!("缺少参数: value"))?;
                state
                    .config_manager
                    .set_global_value(key, value)
                    .map_err(|e| anyhow!(e.to_string()))?;
                println!("{} = {}", key, value);
                Ok(())
            }
            _ => bail!("未知的 config 子命令\n{}", USAGE),
        },
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }
}

fn parse_arg<T>(args: &[String], index: usize, name: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .get(index)
        .ok_or_else(|| anyhow!("缺少参数: {}", name))?;
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("参数 {} 无法解析: {}", name, raw))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
