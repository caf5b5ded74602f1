use clap::{CommandFactory, FromArgMatches};
use itertools::Itertools;
use log::{info, warn};
use os_str_bytes::OsStrBytesExt;
use took::Timer;

use fleet_router::io::report_writer::write_report;
use fleet_router::io::{load_instance, sample, RouterSettings, Scenario};
use fleet_router::utils::logging::{format_log_report, format_log_report_timed};
use fleet_router::utils::validator::validate_report;
use fleet_router::utils::{create_seeded_rng, generate_deliveries, DeliveryGeneratorSettings};

mod cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )?;
    let args = cli::ProgramArguments::from_arg_matches(
        &cli::ProgramArguments::command()
            .get_matches_from(args.iter().flat_map(|it| {
                it.split(" ").into_iter().collect::<Vec<_>>()
            }))
    )?;
    info!("{:?}", &args);

    let (seed_value, mut rng) = {
        let seed_value = args.seed();
        info!("seed: {}", seed_value);
        (seed_value, create_seeded_rng(seed_value))
    };

    let load_timer = Timer::new();
    let Scenario {
        name,
        mut network,
        mut deliveries,
        router: router_settings,
    } = match (&args.instance, args.sample) {
        (Some(path), _) => load_instance(path)?,
        (None, Some(vehicles_per_center)) => Scenario {
            name: "brazil-sample".to_string(),
            network: sample::brazil_network(vehicles_per_center)?,
            deliveries: if args.generate.is_some() {
                vec![]
            } else {
                sample::demo_deliveries()?
            },
            router: RouterSettings::default(),
        },
        (None, None) => anyhow::bail!("either --instance or --sample is required"),
    };
    if let Some(queue) = args.queue() {
        network.graph.set_queue(queue);
    }
    if let Some(count) = args.generate {
        let destinations = network.destinations();
        if destinations.is_empty() {
            warn!("no destinations to generate orders for");
        }
        deliveries.extend(generate_deliveries(
            &mut rng,
            count,
            &destinations,
            &DeliveryGeneratorSettings::default(),
        )?);
    }
    if let Some(id) = deliveries.iter().map(|it| it.id()).duplicates().next() {
        anyhow::bail!("delivery id {id} is used more than once");
    }
    info!("{name} loaded after {}: {:?}", load_timer.took(), network);

    let config = args.router_config(&router_settings);
    info!("starting router {:?} on {} deliveries", config, deliveries.len());
    let num_deliveries = deliveries.len();
    let timer = Timer::new();
    let mut router = network.router(config);
    let report = router.allocate(deliveries);
    let took = timer.took();
    let vehicles_used = router.vehicles_used();
    info!("{}", format_log_report_timed("allocation", &report, vehicles_used, took.clone()));

    let validation = validate_report(&network.graph, router.centers(), &report);
    if !validation.is_valid() {
        warn!("report violates fleet invariants: {:?}", validation);
    }
    #[cfg(feature = "report-assertions")]
    validation.assert_valid();

    if args.print_summary_to_stdout {
        println!(
            "{},{},{},{},{}",
            num_deliveries,
            report.num_allocated(),
            report.num_rejected(),
            vehicles_used,
            took.as_std().as_millis()
        );
    }

    if let Some(report_path) = &args.report {
        write_report(report_path.as_str(), &report, args.report_format())?;
        info!("report written to {report_path} (seed {seed_value})");
    } else {
        info!("allocation summary: {}", format_log_report(&report, vehicles_used));
    }

    Ok(())
}
