//! Penalty duel used to score controllers.
//!
//! Each game is a series of shots. For every shot the ball is placed at a random spot
//! and both controllers read the same noisy sensors:
//!
//! | index | sensor                                  |
//! |-------|-----------------------------------------|
//! | 0     | distance of the ball to the goal line   |
//! | 1     | lateral position of the ball            |
//! | 2     | bias (always `1.0`)                     |
//!
//! Every tick the keeper (blue) moves toward the position given by its first output,
//! limited by its speed, and the striker (red) shoots when its second output is
//! positive, aiming at its first output. A shot that is not taken within the tick
//! limit times out. An empty network output means no action for that tick.
//!
//! Every shot ends in exactly one [`ShotOutcome`]. Red scores goals, blue scores saves.
//! Without a keeper (solo games) the goal is guarded by a keeper that stays centered.

use neuroevo_network::{NeuralNetwork, Topology};
use rand::Rng;
use rand_distr::{Distribution as _, Normal, NormalError};

pub const SENSOR_COUNT: usize = 3;
pub const ACTION_COUNT: usize = 2;

/// Scale from a `tanh` output to a lateral position; aims beyond the posts miss.
const AIM_SCALE: f32 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaParams {
    pub shots: usize,
    pub max_ticks: usize,
    /// Standard deviation of the sensor noise.
    pub sensor_noise: f32,
    pub keeper_reach: f32,
    /// Maximum keeper movement per tick, also applied while the ball travels.
    pub keeper_speed: f32,
}

impl Default for ArenaParams {
    fn default() -> Self {
        Self {
            shots: 5,
            max_ticks: 8,
            sensor_noise: 0.05,
            keeper_reach: 0.25,
            keeper_speed: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Goal,
    Saved,
    Missed,
    TimedOut,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelScore {
    pub goals: usize,
    pub saves: usize,
    pub misses: usize,
    pub timeouts: usize,
}

impl DuelScore {
    fn record(&mut self, outcome: ShotOutcome) {
        match outcome {
            ShotOutcome::Goal => self.goals += 1,
            ShotOutcome::Saved => self.saves += 1,
            ShotOutcome::Missed => self.misses += 1,
            ShotOutcome::TimedOut => self.timeouts += 1,
        }
    }

    #[must_use]
    pub fn shots(&self) -> usize {
        self.goals + self.saves + self.misses + self.timeouts
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn red_score(&self) -> f32 {
        self.goals as f32
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn blue_score(&self) -> f32 {
        self.saves as f32
    }
}

#[derive(Debug, Clone, Copy)]
struct Ball {
    distance: f32,
    lateral: f32,
}

#[derive(Debug, Clone)]
pub struct Arena {
    params: ArenaParams,
    noise: Normal<f32>,
}

impl Arena {
    pub fn new(params: ArenaParams) -> Result<Self, NormalError> {
        let noise = Normal::new(0.0, params.sensor_noise)?;
        Ok(Self { params, noise })
    }

    /// Whether networks of `topology` can read the sensors and drive both roles.
    #[must_use]
    pub fn fits(topology: &Topology) -> bool {
        topology.input_len() == SENSOR_COUNT && topology.output_len() >= ACTION_COUNT
    }

    pub fn play<R>(
        &self,
        striker: &NeuralNetwork,
        keeper: Option<&NeuralNetwork>,
        rng: &mut R,
    ) -> DuelScore
    where
        R: Rng + ?Sized,
    {
        let mut score = DuelScore::default();
        for _ in 0..self.params.shots {
            let ball = Ball {
                distance: rng.random_range(0.3..1.0),
                lateral: rng.random_range(-0.5..0.5),
            };
            score.record(self.shoot(ball, striker, keeper, rng));
        }
        score
    }

    fn shoot<R>(
        &self,
        ball: Ball,
        striker: &NeuralNetwork,
        keeper: Option<&NeuralNetwork>,
        rng: &mut R,
    ) -> ShotOutcome
    where
        R: Rng + ?Sized,
    {
        let mut keeper_pos = 0.0_f32;
        for _ in 0..self.params.max_ticks {
            if let Some(keeper) = keeper
                && let Some(&target) = keeper.process(&self.sense(ball, rng)).first()
            {
                keeper_pos += (target - keeper_pos)
                    .clamp(-self.params.keeper_speed, self.params.keeper_speed);
            }
            let action = striker.process(&self.sense(ball, rng));
            if let &[aim, power, ..] = action.as_slice()
                && power > 0.0
            {
                return self.resolve(ball, aim * AIM_SCALE, keeper_pos);
            }
        }
        ShotOutcome::TimedOut
    }

    fn resolve(&self, ball: Ball, aim: f32, keeper_pos: f32) -> ShotOutcome {
        if aim.abs() > 1.0 {
            return ShotOutcome::Missed;
        }
        let reach = self.params.keeper_reach + ball.distance * self.params.keeper_speed;
        if (aim - keeper_pos).abs() <= reach {
            ShotOutcome::Saved
        } else {
            ShotOutcome::Goal
        }
    }

    fn sense<R>(&self, ball: Ball, rng: &mut R) -> [f32; SENSOR_COUNT]
    where
        R: Rng + ?Sized,
    {
        [
            ball.distance + self.noise.sample(rng),
            ball.lateral + self.noise.sample(rng),
            1.0,
        ]
    }
}
