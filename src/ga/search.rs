//! Population-based search over valid schedules.
//!
//! # Algorithm
//!
//! 1. Generate `pop_size` schedules in parallel. Load the best record from
//!    the checkpoint store (or generate, evaluate and save one) and add its
//!    schedule to the population.
//! 2. For each generation:
//!    - mutate every member in parallel, one child per parent
//!    - drop children equal to a member already in the population
//!    - evaluate everyone in parallel
//!    - stable-sort by distance and keep the `pop_size` shortest
//!    - on a strictly shorter best, update the record and save it
//! 3. Return the best record and the per-generation best distances.
//!
//! There is no crossover and no convergence stop; the run always lasts
//! `gen_count` generations.
//!
//! # Determinism
//! Every parallel task seeds its own RNG from the master seed, the phase
//! and the task index, so a seeded run gives the same result with any
//! number of workers.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::generator::ScheduleGenerator;
use super::operators::{MutationEngine, MutationOperator};
use crate::checkpoint::CheckpointStore;
use crate::config::SearchConfig;
use crate::error::{TtpError, TtpResult};
use crate::evaluation::DistanceEvaluator;
use crate::models::{BestRecord, ProblemInstance, Schedule};
use crate::parallel::WorkerPool;

const STREAM_INITIAL: u64 = 0;
const STREAM_SEED_RECORD: u64 = 1;
const STREAM_FIRST_GENERATION: u64 = 2;

/// Progress of one completed generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// 1-based generation number.
    pub generation: usize,
    /// Generations in the run.
    pub total: usize,
    /// Best distance so far.
    pub best_distance: u64,
    /// Shortest distance in the current population.
    pub population_best: u64,
    /// Children that survived deduplication.
    pub accepted_children: usize,
    /// Whether this generation improved the best record.
    pub improved: bool,
    /// Time spent on this generation.
    pub elapsed: Duration,
    /// This generation's time multiplied by the generations left.
    pub estimated_remaining: Duration,
}

/// Hooks called by [`PopulationSearch`] as the run progresses.
pub trait SearchObserver {
    /// Called once the initial population and best record are ready.
    fn on_initialized(&mut self, _population: usize, _best: &BestRecord) {}

    /// Called after each generation.
    fn on_generation(&mut self, _report: &GenerationReport) {}
}

/// Reports progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn on_initialized(&mut self, population: usize, best: &BestRecord) {
        info!(population, best = best.distance, "search initialized");
    }

    fn on_generation(&mut self, report: &GenerationReport) {
        info!(
            generation = report.generation,
            total = report.total,
            best = report.best_distance,
            remaining_secs = report.estimated_remaining.as_secs(),
            "generation complete"
        );
    }
}

/// Outcome of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best schedule found, including any loaded from the checkpoint.
    pub best: BestRecord,
    /// Best distance after each generation. Non-increasing.
    pub history: Vec<u64>,
    /// Generations run.
    pub generations: usize,
    /// Generations that improved the best record.
    pub improvements: usize,
}

/// Mutation-and-truncation search with checkpointing.
///
/// # Example
/// ```no_run
/// use u_tournament::{FileCheckpointStore, PopulationSearch, SearchConfig};
/// # fn run(instance: &u_tournament::ProblemInstance) -> u_tournament::TtpResult<()> {
/// let config = SearchConfig::default().with_teams(instance.teams()).with_seed(42);
/// let store = FileCheckpointStore::new("NL Schedules");
/// let result = PopulationSearch::new(instance, config, store)?.run()?;
/// println!("best distance: {}", result.best.distance);
/// # Ok(())
/// # }
/// ```
pub struct PopulationSearch<'a, S: CheckpointStore> {
    instance: &'a ProblemInstance,
    config: SearchConfig,
    store: S,
    pool: WorkerPool,
    generator: ScheduleGenerator,
    mutation: MutationEngine,
    evaluator: DistanceEvaluator,
    seed: u64,
}

impl<'a, S: CheckpointStore> PopulationSearch<'a, S> {
    /// Prepares a search.
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration is out of range or its team
    /// count differs from the instance's; `ThreadPool` if the workers
    /// cannot be started.
    pub fn new(instance: &'a ProblemInstance, config: SearchConfig, store: S) -> TtpResult<Self> {
        config.validate()?;
        if config.teams != instance.teams() {
            return Err(TtpError::InvalidConfig(format!(
                "configured for {} teams but the instance has {}",
                config.teams,
                instance.teams()
            )));
        }

        let pool = WorkerPool::new(config.workers)?;
        let generator = ScheduleGenerator::new(config.teams, config.generator);
        let mutation = MutationEngine::new(generator.clone());
        let evaluator = DistanceEvaluator::new(instance.shared_distances());
        let seed = config.seed.unwrap_or_else(rand::random);

        Ok(Self {
            instance,
            config,
            store,
            pool,
            generator,
            mutation,
            evaluator,
            seed,
        })
    }

    /// Master seed in use.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The checkpoint store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the search, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs the search, logging progress through `tracing`.
    pub fn run(&mut self) -> TtpResult<SearchResult> {
        self.run_with_observer(&mut LogObserver)
    }

    /// Runs the search, reporting progress to `observer`.
    ///
    /// # Errors
    /// - `MalformedCheckpoint` / `Io` from the checkpoint store
    /// - `ConstructionFailed` if a schedule cannot be built within the
    ///   generator's attempt cap
    pub fn run_with_observer(
        &mut self,
        observer: &mut dyn SearchObserver,
    ) -> TtpResult<SearchResult> {
        let pop_size = self.config.pop_size;
        let gen_count = self.config.gen_count;
        info!(
            teams = self.instance.teams(),
            pop_size,
            gen_count,
            workers = self.pool.workers(),
            seed = self.seed,
            "search started"
        );

        let mut population = self.initial_population()?;
        let mut best = self.load_or_seed_record()?;
        population.push(best.schedule.clone());
        observer.on_initialized(population.len(), &best);

        let mut history = Vec::with_capacity(gen_count);
        let mut improvements = 0;
        let mut operator_counts = [0usize; MutationOperator::ALL.len()];

        for generation in 0..gen_count {
            let started = Instant::now();
            let stream = STREAM_FIRST_GENERATION + generation as u64;

            let seed = self.seed;
            let mutation = &self.mutation;
            let children = self
                .pool
                .map(&population, |i, parent| {
                    let mut rng = SmallRng::seed_from_u64(task_seed(seed, stream, i as u64));
                    mutation.mutate(parent, &mut rng)
                })
                .into_iter()
                .collect::<TtpResult<Vec<_>>>()?;
            for child in &children {
                operator_counts[child.operator.index()] += 1;
            }
            let accepted = merge_unique(&mut population, children.into_iter().map(|m| m.schedule));

            let evaluator = &self.evaluator;
            let distances = self.pool.map(&population, |_, s| evaluator.evaluate(s));
            let mut scored: Vec<(u64, Schedule)> = distances.into_iter().zip(population).collect();
            scored.sort_by_key(|&(d, _)| d);
            scored.truncate(pop_size);

            let population_best = scored[0].0;
            let improved = population_best < best.distance;
            if improved {
                best = BestRecord {
                    schedule: scored[0].1.clone(),
                    distance: population_best,
                };
                self.store.save(&best, self.instance)?;
                improvements += 1;
                info!(generation = generation + 1, distance = best.distance, "new best schedule");
            }
            population = scored.into_iter().map(|(_, s)| s).collect();
            history.push(best.distance);

            let elapsed = started.elapsed();
            let remaining = (gen_count - generation - 1) as u32;
            debug!(
                generation = generation + 1,
                population_best,
                accepted,
                population = population.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "generation detail"
            );
            observer.on_generation(&GenerationReport {
                generation: generation + 1,
                total: gen_count,
                best_distance: best.distance,
                population_best,
                accepted_children: accepted,
                improved,
                elapsed,
                estimated_remaining: elapsed * remaining,
            });
        }

        for op in MutationOperator::ALL {
            debug!(operator = op.name(), children = operator_counts[op.index()], "operator usage");
        }
        info!(best = best.distance, improvements, "search finished");

        Ok(SearchResult {
            best,
            history,
            generations: gen_count,
            improvements,
        })
    }

    fn initial_population(&self) -> TtpResult<Vec<Schedule>> {
        let seed = self.seed;
        let generator = &self.generator;
        self.pool
            .map_range(self.config.pop_size, |i| {
                let mut rng = SmallRng::seed_from_u64(task_seed(seed, STREAM_INITIAL, i as u64));
                generator.generate(&mut rng)
            })
            .into_iter()
            .collect()
    }

    fn load_or_seed_record(&mut self) -> TtpResult<BestRecord> {
        if let Some(record) = self.store.load(self.instance)? {
            info!(distance = record.distance, "loaded best schedule from checkpoint");
            return Ok(record);
        }
        let mut rng = SmallRng::seed_from_u64(task_seed(self.seed, STREAM_SEED_RECORD, 0));
        let schedule = self.generator.generate(&mut rng)?;
        let distance = self.evaluator.evaluate(&schedule);
        let record = BestRecord { schedule, distance };
        self.store.save(&record, self.instance)?;
        info!(distance, "no checkpoint; saved a fresh schedule");
        Ok(record)
    }
}

/// Appends each child not structurally equal to a current member.
///
/// Children accepted earlier in the same call count as members, so two
/// identical children are kept once. Returns the number appended.
pub(crate) fn merge_unique(
    population: &mut Vec<Schedule>,
    children: impl IntoIterator<Item = Schedule>,
) -> usize {
    let before = population.len();
    for child in children {
        if !population.contains(&child) {
            population.push(child);
        }
    }
    population.len() - before
}

/// Seed for one parallel task (splitmix64 finalizer over the inputs).
pub(crate) fn task_seed(master: u64, stream: u64, index: u64) -> u64 {
    let mut z = master
        ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ index.wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::MemoryCheckpointStore;
    use crate::evaluation::total_distance;
    use crate::test_support::{four_team_schedule, nl4_instance, uniform_instance};
    use crate::validation::{is_valid, validate_schedule};
    use std::collections::HashSet;

    fn config(teams: usize, pop: usize, gens: usize) -> SearchConfig {
        SearchConfig::default()
            .with_teams(teams)
            .with_pop_size(pop)
            .with_gen_count(gens)
            .with_workers(2)
            .with_seed(42)
    }

    /// Every valid mirrored 4-team schedule.
    fn all_four_team_schedules() -> Vec<Schedule> {
        let matchings = [[(1, 2), (3, 4)], [(1, 3), (2, 4)], [(1, 4), (2, 3)]];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let mut out = Vec::new();
        for order in orders {
            for mask in 0u32..64 {
                let mut rows = vec![vec![0i32; 6]; 4];
                for (round, &m) in order.iter().enumerate() {
                    for (g, &(a, b)) in matchings[m].iter().enumerate() {
                        let a_home = mask & (1 << (round * 2 + g)) != 0;
                        let (home, away) = if a_home { (a, b) } else { (b, a) };
                        rows[home - 1][round] = away as i32;
                        rows[away - 1][round] = -(home as i32);
                        rows[home - 1][round + 3] = -(away as i32);
                        rows[away - 1][round + 3] = home as i32;
                    }
                }
                let s = Schedule::from_rows(rows).unwrap();
                if is_valid(&s) {
                    out.push(s);
                }
            }
        }
        out
    }

    #[derive(Default)]
    struct Recorder {
        initialized: usize,
        reports: Vec<GenerationReport>,
    }

    impl SearchObserver for Recorder {
        fn on_initialized(&mut self, population: usize, _best: &BestRecord) {
            self.initialized = population;
        }
        fn on_generation(&mut self, report: &GenerationReport) {
            self.reports.push(report.clone());
        }
    }

    #[test]
    fn test_history_is_non_increasing() {
        let inst = uniform_instance(8, 1);
        let mut search =
            PopulationSearch::new(&inst, config(8, 20, 15), MemoryCheckpointStore::new()).unwrap();
        let result = search.run().unwrap();
        assert_eq!(result.generations, 15);
        assert_eq!(result.history.len(), 15);
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*result.history.last().unwrap(), result.best.distance);
    }

    #[test]
    fn test_best_is_valid_and_saved() {
        let inst = nl4_instance();
        let mut search =
            PopulationSearch::new(&inst, config(4, 10, 10), MemoryCheckpointStore::new()).unwrap();
        let result = search.run().unwrap();
        assert!(validate_schedule(&result.best.schedule).is_ok());
        assert_eq!(result.best.distance, total_distance(&result.best.schedule, inst.distances()));

        let store = search.into_store();
        // Initial save plus one per improvement.
        assert_eq!(store.saves(), 1 + result.improvements);
        assert_eq!(store.record(), Some(&result.best));
    }

    #[test]
    fn test_seeded_runs_ignore_worker_count() {
        let inst = nl4_instance();
        let run = |workers| {
            let cfg = config(4, 16, 12).with_workers(workers);
            PopulationSearch::new(&inst, cfg, MemoryCheckpointStore::new())
                .unwrap()
                .run()
                .unwrap()
        };
        let a = run(1);
        let b = run(4);
        assert_eq!(a.history, b.history);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_preloaded_record_never_regresses() {
        let inst = nl4_instance();
        let schedule = four_team_schedule();
        let distance = total_distance(&schedule, inst.distances());
        let store = MemoryCheckpointStore::with_record(BestRecord { schedule, distance });

        let mut search = PopulationSearch::new(&inst, config(4, 8, 5), store).unwrap();
        let result = search.run().unwrap();
        assert!(result.best.distance <= distance);
        assert!(result.history.iter().all(|&d| d <= distance));
        // The loaded record is not saved again unless improved.
        assert_eq!(search.store().saves(), result.improvements);
    }

    #[test]
    fn test_observer_sees_every_generation() {
        let inst = nl4_instance();
        let mut search =
            PopulationSearch::new(&inst, config(4, 6, 7), MemoryCheckpointStore::new()).unwrap();
        let mut recorder = Recorder::default();
        let result = search.run_with_observer(&mut recorder).unwrap();
        assert_eq!(recorder.initialized, 7);
        assert_eq!(recorder.reports.len(), 7);
        for (i, report) in recorder.reports.iter().enumerate() {
            assert_eq!(report.generation, i + 1);
            assert_eq!(report.total, 7);
            assert_eq!(report.best_distance, result.history[i]);
            assert!(report.population_best >= report.best_distance);
        }
        assert_eq!(recorder.reports[6].estimated_remaining, Duration::ZERO);
    }

    #[test]
    fn test_zero_generations_returns_seed_record() {
        let inst = nl4_instance();
        let mut search =
            PopulationSearch::new(&inst, config(4, 4, 0), MemoryCheckpointStore::new()).unwrap();
        let result = search.run().unwrap();
        assert!(result.history.is_empty());
        assert!(is_valid(&result.best.schedule));
    }

    #[test]
    fn test_uniform_distances_stay_multiples() {
        let inst = uniform_instance(4, 10);
        let mut search =
            PopulationSearch::new(&inst, config(4, 10, 10), MemoryCheckpointStore::new()).unwrap();
        let result = search.run().unwrap();
        assert_eq!(result.best.distance % 10, 0);
        for s in all_four_team_schedules() {
            assert_eq!(total_distance(&s, inst.distances()) % 10, 0);
        }
    }

    #[test]
    fn test_search_reaches_brute_force_optimum() {
        let inst = nl4_instance();
        let all = all_four_team_schedules();
        assert!(!all.is_empty());
        let optimum = all
            .iter()
            .map(|s| total_distance(s, inst.distances()))
            .min()
            .unwrap();

        let mut search =
            PopulationSearch::new(&inst, config(4, 60, 150), MemoryCheckpointStore::new()).unwrap();
        let result = search.run().unwrap();
        assert_eq!(result.best.distance, optimum);
    }

    #[test]
    fn test_brute_force_set_is_mirrored_and_distinct() {
        let all = all_four_team_schedules();
        let unique: HashSet<&Schedule> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
        assert!(all.iter().all(Schedule::is_mirrored));
        assert!(all.contains(&four_team_schedule()));
    }

    #[test]
    fn test_merge_unique_drops_duplicates() {
        let s = four_team_schedule();
        let other = s.inverted();
        let mut population = vec![s.clone()];
        let accepted = merge_unique(&mut population, vec![s.clone(), other.clone(), other.clone()]);
        assert_eq!(accepted, 1);
        assert_eq!(population, vec![s, other]);
    }

    #[test]
    fn test_team_count_mismatch_is_rejected() {
        let inst = nl4_instance();
        let err = PopulationSearch::new(&inst, config(6, 4, 1), MemoryCheckpointStore::new())
            .err()
            .unwrap();
        assert!(matches!(err, TtpError::InvalidConfig(_)));
    }

    #[test]
    fn test_task_seeds_differ() {
        let seeds: HashSet<u64> = (0..3)
            .flat_map(|stream| (0..100).map(move |i| task_seed(42, stream, i)))
            .collect();
        assert_eq!(seeds.len(), 300);
        assert_eq!(task_seed(7, 1, 2), task_seed(7, 1, 2));
    }
}
