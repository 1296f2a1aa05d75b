//! Gene vector operators shared by every individual strategy.
//!
//! These are the building blocks [`Individual`](crate::Individual) dispatches to for
//! initialization, mutation and crossover. All of them draw from the caller's RNG so
//! a run seeded once is reproducible end to end.
//!
//! A gene is touched by a per-gene operator iff a uniform draw in `[0, 1)` is below
//! the operator's probability: probability `0.0` never touches a gene and `1.0`
//! touches all of them.

use rand::Rng;

/// Generates `len` genes drawn uniformly from `[-1, 1]`.
pub fn random<R>(rng: &mut R, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    (0..len).map(|_| rng.random_range(-1.0..=1.0)).collect()
}

/// Replaces each gene, with probability `probability`, by a fresh uniform value in `[-1, 1]`.
pub fn mutate_reset<R>(genes: &mut [f32], probability: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for gene in genes {
        if rng.random::<f32>() < probability {
            *gene = rng.random_range(-1.0..=1.0);
        }
    }
}

/// Adds `N(0, sigma²)` noise to each gene with probability `probability`.
pub fn mutate_gaussian<R>(genes: &mut [f32], probability: f32, sigma: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for gene in genes {
        if rng.random::<f32>() < probability {
            *gene += sigma * next_gaussian(rng);
        }
    }
}

/// Draws a standard normal deviate with the Marsaglia polar method.
///
/// Two uniforms in `[-1, 1)` are drawn until their squared norm `s` lies in `(0, 1)`,
/// then `v1 * sqrt(-2 ln(s) / s)` is returned.
pub fn next_gaussian<R>(rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    loop {
        let v1 = 2.0 * rng.random::<f32>() - 1.0;
        let v2 = 2.0 * rng.random::<f32>() - 1.0;
        let s = v1 * v1 + v2 * v2;
        if s < 1.0 && s > 0.0 {
            return v1 * (-2.0 * s.ln() / s).sqrt();
        }
    }
}

/// Single-point crossover producing two children in place.
///
/// With probability `probability`, a cut index is drawn from `[1, len - 1]` and every
/// gene before it is swapped between `a` and `b`. Both parents are overwritten: the
/// two slices hold the two children afterwards. Returns whether a cut happened.
///
/// Gene vectors shorter than 2 are never cut.
///
/// # Panics
///
/// Panics if the two gene vectors have different lengths.
pub fn single_point_crossover<R>(a: &mut [f32], b: &mut [f32], probability: f32, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    assert_eq!(a.len(), b.len(), "crossover partners must have the same length");
    if rng.random::<f32>() >= probability || a.len() < 2 {
        return false;
    }
    let point = rng.random_range(1..a.len());
    a[..point].swap_with_slice(&mut b[..point]);
    true
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;
    use crate::EvoRng;

    #[test]
    fn test_random_genes_in_range() {
        let mut rng = EvoRng::seed_from_u64(1);
        let genes = random(&mut rng, 500);
        assert_eq!(genes.len(), 500);
        assert!(genes.iter().all(|g| (-1.0..=1.0).contains(g)));
    }

    #[test]
    fn test_zero_probability_never_mutates() {
        for seed in 0..20 {
            let mut rng = EvoRng::seed_from_u64(seed);
            let original = random(&mut rng, 64);

            let mut genes = original.clone();
            mutate_gaussian(&mut genes, 0.0, 0.5, &mut rng);
            assert_eq!(genes, original);

            mutate_reset(&mut genes, 0.0, &mut rng);
            assert_eq!(genes, original);
        }
    }

    #[test]
    fn test_full_probability_gaussian_mutates_every_gene() {
        let mut rng = EvoRng::seed_from_u64(42);
        let original = random(&mut rng, 100);
        let mut genes = original.clone();
        mutate_gaussian(&mut genes, 1.0, 0.5, &mut rng);
        for (before, after) in original.iter().zip(&genes) {
            assert_ne!(before, after);
        }
    }

    #[test]
    fn test_reset_mutation_stays_in_range() {
        let mut rng = EvoRng::seed_from_u64(3);
        let mut genes = vec![5.0; 50];
        mutate_reset(&mut genes, 1.0, &mut rng);
        assert!(genes.iter().all(|g| (-1.0..=1.0).contains(g)));
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = EvoRng::seed_from_u64(9);
        let n = 20_000;
        let samples: Vec<f32> = (0..n).map(|_| next_gaussian(&mut rng)).collect();
        #[expect(clippy::cast_precision_loss)]
        let n = n as f32;
        let mean = samples.iter().sum::<f32>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((variance - 1.0).abs() < 0.05, "variance {variance}");
    }

    #[test]
    fn test_crossover_swaps_prefix() {
        let mut rng = EvoRng::seed_from_u64(5);
        for _ in 0..50 {
            let mut a = vec![1.0; 8];
            let mut b = vec![2.0; 8];
            assert!(single_point_crossover(&mut a, &mut b, 1.0, &mut rng));

            let point = a.iter().position(|&g| g == 1.0).unwrap();
            assert!((1..8).contains(&point));
            assert!(a[..point].iter().all(|&g| g == 2.0));
            assert!(a[point..].iter().all(|&g| g == 1.0));
            assert!(b[..point].iter().all(|&g| g == 1.0));
            assert!(b[point..].iter().all(|&g| g == 2.0));
        }
    }

    #[test]
    fn test_crossover_probability_zero_is_noop() {
        let mut rng = EvoRng::seed_from_u64(6);
        let mut a = vec![1.0; 4];
        let mut b = vec![2.0; 4];
        assert!(!single_point_crossover(&mut a, &mut b, 0.0, &mut rng));
        assert_eq!(a, [1.0; 4]);
        assert_eq!(b, [2.0; 4]);
    }

    #[test]
    fn test_crossover_single_gene_is_noop() {
        let mut rng = EvoRng::seed_from_u64(6);
        let mut a = vec![1.0];
        let mut b = vec![2.0];
        assert!(!single_point_crossover(&mut a, &mut b, 1.0, &mut rng));
        assert_eq!(a, [1.0]);
    }
}
