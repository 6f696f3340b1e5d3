//! Train [`Agent`] with hindsight experience replay.
mod config;
mod sampler;
use crate::{
    ere::EreScheduler,
    her_buffer::{HerReplayBuffer, HerReplayBufferConfig},
    record::{
        AggregateRecorder, Record,
        RecordValue::{DateTime, Scalar},
    },
    relabel::{RelabelConfig, Relabeler},
    Agent, Evaluator, GoalEnv,
};
use anyhow::Result;
use chrono::Local;
pub use config::HerTrainerConfig;
use log::info;
pub use sampler::Sampler;
use std::{
    collections::VecDeque,
    time::{Duration, SystemTime},
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop and related objects.
///
/// # Training loop
///
/// Training is organized in epochs, each made of cycles:
///
/// 0. Given an agent implementing [`Agent`], a recorder implementing
///    [`AggregateRecorder`] and an evaluator implementing [`Evaluator`].
/// 1. Build the environment, the [`HerReplayBuffer`] and the [`Relabeler`].
///    Reset the counter of environment steps.
/// 2. For each cycle of each epoch:
///     1. Play `episodes_per_cycle` episodes of at most `episode_len` steps.
///        For each trajectory:
///         * Store every hindsight experience the relabeler derives from it.
///         * Hand the stored experiences to [`Agent::observe`].
///     2. If `env_steps >= warmup_steps`, run `K = min(played_steps, opt_steps_per_cycle)`
///        optimization steps. The `k`-th step draws its batch from the most recent
///        [`EreScheduler::window`] items, or from the whole buffer if ERE is disabled.
///     3. Store `mean_reward`, `buffer_size`, `opt_steps_per_sec` and the record of
///        the last optimization step, then flush at `env_steps`.
/// 3. At the end of each epoch, evaluate the agent in evaluation mode and flush
///    the result.
/// 4. Restore the training or evaluation mode the agent had before training.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|action|B[GoalEnv]
///     B -->|GoalObs|A
///     B -->|Trajectory|C[Relabeler]
///     C -->|HindsightExperience|D[HerReplayBuffer]
///     C -->|HindsightExperience|A
///     D -->|HerBatch|A
/// ```
pub struct HerTrainer<E: GoalEnv> {
    config: HerTrainerConfig,

    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Configuration of the replay buffer.
    buffer_config: HerReplayBufferConfig,

    /// Configuration of the relabeler.
    relabel_config: RelabelConfig,

    ere: Option<EreScheduler>,

    /// Optimization steps for computing optimization steps per second.
    opt_steps_for_ops: usize,

    /// Timer for computing optimization steps per second.
    timer_for_ops: Duration,
}

impl<E: GoalEnv> HerTrainer<E> {
    /// Constructs a trainer. Fails if the ERE configuration is invalid.
    pub fn build(
        config: HerTrainerConfig,
        env_config: E::Config,
        buffer_config: HerReplayBufferConfig,
        relabel_config: RelabelConfig,
    ) -> Result<Self> {
        let ere = match &config.ere {
            Some(ere) => Some(EreScheduler::build(ere)?),
            None => None,
        };

        Ok(Self {
            config,
            env_config,
            buffer_config,
            relabel_config,
            ere,
            opt_steps_for_ops: 0,
            timer_for_ops: Duration::new(0, 0),
        })
    }

    /// Returns optimization steps per second, then resets the internal counter.
    fn opt_steps_per_sec(&mut self) -> f32 {
        let osps = self.opt_steps_for_ops as f32 / self.timer_for_ops.as_secs_f32().max(1e-6);
        self.opt_steps_for_ops = 0;
        self.timer_for_ops = Duration::new(0, 0);
        osps
    }

    /// Sampling window of the `k`-th of `total` optimization steps in a cycle.
    fn window(&self, buffer: &HerReplayBuffer, k: usize, total: usize) -> usize {
        match &self.ere {
            Some(ere) => ere.window(buffer.capacity(), k, total, buffer.len()),
            None => buffer.len(),
        }
    }

    /// Runs `total` optimization steps and returns the record of the last one.
    fn optimize<A>(
        &mut self,
        agent: &mut A,
        buffer: &mut HerReplayBuffer,
        total: usize,
    ) -> Result<Record>
    where
        A: Agent<E, HerReplayBuffer>,
    {
        let mut record = Record::empty();
        let timer = SystemTime::now();

        for k in 0..total {
            let window = self.window(buffer, k, total);
            if k + 1 == total {
                record = agent.opt_with_record(buffer, window)?;
                record.insert("sampling_window", Scalar(window as f32));
            } else {
                agent.opt(buffer, window)?;
            }
        }

        self.timer_for_ops += timer.elapsed()?;
        self.opt_steps_for_ops += total;
        Ok(record)
    }

    /// Plays one cycle, adding the environment steps played to `env_steps`.
    fn cycle<A>(
        &mut self,
        agent: &mut A,
        sampler: &mut Sampler<E>,
        buffer: &mut HerReplayBuffer,
        relabeler: &mut Relabeler,
        rewards: &mut VecDeque<f32>,
        env_steps: &mut usize,
    ) -> Result<Record>
    where
        A: Agent<E, HerReplayBuffer>,
    {
        let mut record = Record::empty();
        let mut played = 0;

        for _ in 0..self.config.episodes_per_cycle {
            let (trajectory, record_episode) = sampler.sample_episode(agent)?;
            played += trajectory.len();
            for exp in trajectory.iter() {
                rewards.push_back(exp.reward());
                while rewards.len() > self.config.reward_window {
                    rewards.pop_front();
                }
            }

            let env = sampler.env();
            let stored = buffer.store_trajectory(&trajectory, relabeler, |achieved, desired| {
                env.compute_reward(achieved, desired, None)
            })?;
            agent.observe(&stored)?;
            record.merge_inplace(record_episode);
        }
        *env_steps += played;

        if *env_steps >= self.config.warmup_steps {
            let total = played.min(self.config.opt_steps_per_cycle);
            record.merge_inplace(self.optimize(agent, buffer, total)?);
            record.insert("opt_steps_per_sec", Scalar(self.opt_steps_per_sec()));
        }

        if !rewards.is_empty() {
            let mean_reward = rewards.iter().sum::<f32>() / rewards.len() as f32;
            record.insert("mean_reward", Scalar(mean_reward));
        }
        record.insert("buffer_size", Scalar(buffer.len() as f32));

        Ok(record)
    }

    /// Trains the agent.
    ///
    /// On return the agent is back in the mode it had on entry.
    pub fn train<A, D>(
        &mut self,
        agent: &mut A,
        recorder: &mut dyn AggregateRecorder,
        evaluator: &mut D,
    ) -> Result<()>
    where
        A: Agent<E, HerReplayBuffer>,
        D: Evaluator<E>,
    {
        let env = E::build(&self.env_config, self.config.seed)?;
        let mut sampler = Sampler::new(env, self.config.episode_len);
        let mut buffer = HerReplayBuffer::new(&self.buffer_config)?;
        let mut relabeler = Relabeler::build(&self.relabel_config);
        let mut rewards = VecDeque::with_capacity(self.config.reward_window);
        let mut env_steps: usize = 0;
        let was_train = agent.is_train();
        agent.train();

        for epoch in 0..self.config.epochs {
            for cycle in 0..self.config.cycles_per_epoch {
                let record = self.cycle(
                    agent,
                    &mut sampler,
                    &mut buffer,
                    &mut relabeler,
                    &mut rewards,
                    &mut env_steps,
                )?;
                info!(
                    "Epoch {}, cycle {}: {} env steps, {} items in the buffer",
                    epoch,
                    cycle,
                    env_steps,
                    buffer.len()
                );
                recorder.store(record);
                recorder.flush(env_steps as _);
            }

            // Evaluation
            info!("Starts evaluation of the trained model");
            agent.eval();
            let mut record = evaluator.evaluate(agent)?;
            agent.train();
            if let Ok(success_rate) = record.get_scalar("success_rate") {
                info!("Epoch {}: success rate {}", epoch, success_rate);
            }
            record.insert("epoch", Scalar(epoch as f32));
            record.insert("datetime", DateTime(Local::now()));
            recorder.store(record);
            recorder.flush(env_steps as _);
        }

        if !was_train {
            agent.eval();
        }
        Ok(())
    }
}
