use anyhow::Result;
use clap::Parser;
use hindsight::{
    dummy::{HeuristicAgent, HeuristicAgentConfig, PointReachConfig, PointReachEnv},
    record::{AggregateRecorder, NullRecorder},
    EreConfig, Evaluator, GoalStrategy, HerReplayBufferConfig, HerTrainer, HerTrainerConfig,
    RelabelConfig, SuccessRateEvaluator, TensorboardRecorder,
};
use log::info;

const EPISODE_LEN: usize = 50;
const REPLAY_BUFFER_CAPACITY: usize = 100_000;
const N_EPISODES_PER_EVAL: usize = 10;

/// Train a scripted agent on the point reach task with hindsight experience replay
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of epochs
    #[arg(long, default_value_t = 5)]
    epochs: usize,

    /// Goal selection strategy, "final" or "future"
    #[arg(short, long, default_value = "future")]
    strategy: String,

    /// Number of future goals per transition
    #[arg(short = 'k', long, default_value_t = 4)]
    future_k: usize,

    /// Emphasize recent experience when sampling batches
    #[arg(long, default_value_t = false)]
    ere: bool,

    /// ERE decay rate
    #[arg(long, default_value_t = 0.996)]
    eta: f32,

    /// Write records for TensorBoard into this directory
    #[arg(long)]
    logdir: Option<String>,

    /// Print the configurations as YAML and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

mod config {
    use super::*;

    pub fn env_config() -> PointReachConfig {
        PointReachConfig::default().max_steps(EPISODE_LEN)
    }

    pub fn trainer_config(args: &Args) -> HerTrainerConfig {
        let config = HerTrainerConfig::default()
            .epochs(args.epochs)
            .cycles_per_epoch(10)
            .episodes_per_cycle(2)
            .episode_len(EPISODE_LEN)
            .opt_steps_per_cycle(40)
            .warmup_steps(2 * EPISODE_LEN);
        match args.ere {
            true => config.ere(
                EreConfig::default()
                    .eta(args.eta)
                    .min_window(2_500)
                    .episode_len(EPISODE_LEN),
            ),
            false => config,
        }
    }

    pub fn relabel_config(args: &Args) -> Result<RelabelConfig> {
        let strategy: GoalStrategy = args.strategy.parse()?;
        Ok(RelabelConfig::default()
            .strategy(strategy)
            .future_k(args.future_k))
    }

    pub fn buffer_config() -> HerReplayBufferConfig {
        HerReplayBufferConfig::default().capacity(REPLAY_BUFFER_CAPACITY)
    }
}

fn create_recorder(logdir: &Option<String>) -> Box<dyn AggregateRecorder> {
    match logdir {
        Some(logdir) => Box::new(TensorboardRecorder::new(logdir)),
        None => Box::new(NullRecorder::new()),
    }
}

fn train(args: &Args, recorder: &mut dyn AggregateRecorder) -> Result<f32> {
    let env_config = config::env_config();
    let mut trainer = HerTrainer::<PointReachEnv>::build(
        config::trainer_config(args),
        env_config.clone(),
        config::buffer_config(),
        config::relabel_config(args)?,
    )?;
    let mut agent = HeuristicAgent::build(&HeuristicAgentConfig::default(), env_config.step_size)?;
    let mut evaluator = SuccessRateEvaluator::<PointReachEnv>::new(
        &env_config,
        0,
        N_EPISODES_PER_EVAL,
        EPISODE_LEN,
    )?;

    // The agent is left in evaluation mode, as it was built
    trainer.train(&mut agent, recorder, &mut evaluator)?;

    let record = evaluator.evaluate(&mut agent)?;
    let success_rate = record.get_scalar("success_rate")?;
    info!("Success rate after training: {}", success_rate);
    Ok(success_rate)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.print_config {
        println!("{}", serde_yaml::to_string(&config::trainer_config(&args))?);
        println!("{}", serde_yaml::to_string(&config::relabel_config(&args)?)?);
        println!("{}", serde_yaml::to_string(&config::buffer_config())?);
        return Ok(());
    }

    let mut recorder = create_recorder(&args.logdir);
    train(&args, recorder.as_mut())?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use hindsight::record::BufferedRecorder;
    use tempdir::TempDir;

    fn args(strategy: &str, ere: bool) -> Args {
        Args {
            epochs: 1,
            strategy: strategy.to_string(),
            future_k: 2,
            ere,
            eta: 0.9,
            logdir: None,
            print_config: false,
        }
    }

    #[test]
    fn test_her_point_reach() -> Result<()> {
        let mut recorder = BufferedRecorder::new();
        let success_rate = train(&args("final", true), &mut recorder)?;
        assert_eq!(success_rate, 1.);
        assert!(!recorder.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_strategy() {
        let mut recorder = NullRecorder::new();
        assert!(train(&args("episode", false), &mut recorder).is_err());
    }

    #[test]
    fn test_tensorboard_logdir() -> Result<()> {
        let dir = TempDir::new("her_point_reach")?;
        let mut args = args("future", false);
        args.logdir = Some(dir.path().to_string_lossy().into_owned());

        let mut recorder = create_recorder(&args.logdir);
        train(&args, recorder.as_mut())?;
        Ok(())
    }
}
