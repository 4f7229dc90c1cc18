//! TCP 拥塞控制仿真入口
//!
//! 选择算法与拓扑，按给定轮数驱动仿真，结束后在控制台汇报
//! 吞吐/重传率/超时数，并把同一行数据追加进统计 CSV。

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tcpsim_rs::sim::{reporting, Simulator, TOTAL_DATA_LENGTH};
use tcpsim_rs::stats::SessionStats;
use tcpsim_rs::tcp::CongestionAlgorithm;
use tcpsim_rs::topo::{Topology, TopologyKind, TopologyOpts};
use tcpsim_rs::viz::CwndLogger;
use tracing::error;

#[derive(Debug, Parser)]
#[command(
    name = "tcpsim",
    about = "TCP 拥塞控制仿真：Tahoe/Reno/NewReno × Direct/Cloud 拓扑"
)]
struct Args {
    /// 拥塞控制算法（Tahoe / Reno / NewReno，大小写不敏感）
    algorithm: CongestionAlgorithm,

    /// 仿真轮数（tick 数，每轮一个 RTT）
    iterations: u64,

    /// 拓扑（Direct / Cloud，大小写不敏感）
    topology: TopologyKind,

    /// 路由器缓冲区大小（字节）
    #[arg(default_value_t = tcpsim_rs::net::DEFAULT_BUFFER_BYTES)]
    buffer: u64,

    /// 接收窗口大小（字节）
    #[arg(default_value_t = 65_536)]
    rcv_window: u64,

    /// 客户端数量（Cloud 拓扑）
    #[arg(default_value_t = 1)]
    clients: usize,

    /// 路由器数量
    #[arg(default_value_t = 1)]
    routers: usize,

    /// 组件日志位掩码（REPORTING_* 常量按位或；RUST_LOG 优先）
    #[arg(long, default_value_t = reporting::DEFAULT_REPORTING)]
    reporting: u32,

    /// 输出拥塞窗口采样 JSON（供离线绘图）；不填则不生成
    #[arg(long)]
    viz_json: Option<PathBuf>,
}

fn main() {
    // 参数错误属于操作者错误：报告后以退出码 1 结束。
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            print!("{err}");
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    if args.iterations == 0 {
        eprintln!("iterations must be a positive integer");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(reporting::env_filter_directives(args.reporting))
            }),
        )
        .with_target(true)
        .init();

    println!(
        "================================================================\n\
                   Running TCP {} sender.\n",
        args.algorithm
    );

    let opts = TopologyOpts {
        algorithm: args.algorithm,
        buffer_bytes: args.buffer,
        rcv_window: args.rcv_window,
        num_clients: args.clients,
        num_routers: args.routers,
    };
    let mut topo = Topology::build(args.topology, &opts);

    let mut sim = Simulator::default();
    if args.viz_json.is_some() {
        sim.viz = Some(CwndLogger::default());
    }

    sim.run(&mut topo, args.iterations, TOTAL_DATA_LENGTH);

    if let Some(path) = args.viz_json {
        match sim.viz.as_ref().map(CwndLogger::to_json_pretty) {
            Some(Ok(json)) => {
                if let Err(err) = fs::write(&path, json) {
                    error!(path = %path.display(), %err, "unable to write viz samples");
                }
            }
            Some(Err(err)) => error!(%err, "unable to serialize viz samples"),
            None => {}
        }
    }

    let stats = SessionStats::collect(&topo, args.iterations);
    stats.print_summary();

    // 统计文件写失败不致命：控制台汇总已经给出。
    let file_name = stats.file_name();
    if let Err(err) = stats.write_csv(Path::new(&file_name)) {
        error!(%file_name, %err, "unable to write statistics file");
    }
}
