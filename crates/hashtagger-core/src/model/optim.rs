//! Limited-memory BFGS for smooth unconstrained objectives.

use std::collections::VecDeque;

const HISTORY: usize = 10;
const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;

/// Result of a minimization run.
#[derive(Debug, Clone)]
pub(crate) struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Minimize `objective` starting from `x0`.
///
/// `objective(x, grad)` returns `f(x)` and writes `∇f(x)` into `grad`.
/// Stops once the largest gradient component is at most `tolerance`.
pub(crate) fn minimize<F>(objective: F, x0: Vec<f64>, max_iter: usize, tolerance: f64) -> Minimum
where
    F: Fn(&[f64], &mut [f64]) -> f64,
{
    let n = x0.len();
    let mut x = x0;
    let mut grad = vec![0.0; n];
    let mut value = objective(&x, &mut grad);

    let mut s_hist: VecDeque<Vec<f64>> = VecDeque::with_capacity(HISTORY);
    let mut y_hist: VecDeque<Vec<f64>> = VecDeque::with_capacity(HISTORY);
    let mut rho_hist: VecDeque<f64> = VecDeque::with_capacity(HISTORY);

    let mut x_next = vec![0.0; n];
    let mut grad_next = vec![0.0; n];

    for iteration in 0..max_iter {
        if max_abs(&grad) <= tolerance {
            return Minimum {
                x,
                value,
                iterations: iteration,
                converged: true,
            };
        }

        // Two-loop recursion: direction = -H·grad
        let mut q = grad.clone();
        let mut alphas = vec![0.0; s_hist.len()];
        for k in (0..s_hist.len()).rev() {
            alphas[k] = rho_hist[k] * dot(&s_hist[k], &q);
            axpy(-alphas[k], &y_hist[k], &mut q);
        }
        let gamma = match (s_hist.back(), y_hist.back()) {
            (Some(s), Some(y)) => dot(s, y) / dot(y, y),
            _ => 1.0 / norm(&grad).max(1.0),
        };
        q.iter_mut().for_each(|v| *v *= gamma);
        for k in 0..s_hist.len() {
            let beta = rho_hist[k] * dot(&y_hist[k], &q);
            axpy(alphas[k] - beta, &s_hist[k], &mut q);
        }
        let mut direction: Vec<f64> = q.into_iter().map(|v| -v).collect();

        let mut slope = dot(&direction, &grad);
        if slope >= 0.0 {
            // Not a descent direction; restart from steepest descent.
            s_hist.clear();
            y_hist.clear();
            rho_hist.clear();
            direction = grad.iter().map(|g| -g).collect();
            slope = -dot(&grad, &grad);
        }

        let mut step = 1.0;
        let mut accepted = None;
        for _ in 0..MAX_BACKTRACKS {
            for i in 0..n {
                x_next[i] = x[i] + step * direction[i];
            }
            let candidate = objective(&x_next, &mut grad_next);
            if candidate.is_finite() && candidate <= value + ARMIJO * step * slope {
                accepted = Some(candidate);
                break;
            }
            step *= 0.5;
        }

        let Some(next_value) = accepted else {
            return Minimum {
                x,
                value,
                iterations: iteration,
                converged: false,
            };
        };

        let s: Vec<f64> = x_next.iter().zip(&x).map(|(a, b)| a - b).collect();
        let y: Vec<f64> = grad_next.iter().zip(&grad).map(|(a, b)| a - b).collect();
        let sy = dot(&s, &y);
        if sy > 1e-10 {
            if s_hist.len() == HISTORY {
                s_hist.pop_front();
                y_hist.pop_front();
                rho_hist.pop_front();
            }
            s_hist.push_back(s);
            y_hist.push_back(y);
            rho_hist.push_back(1.0 / sy);
        }

        std::mem::swap(&mut x, &mut x_next);
        std::mem::swap(&mut grad, &mut grad_next);
        value = next_value;
    }

    let converged = max_abs(&grad) <= tolerance;
    Minimum {
        x,
        value,
        iterations: max_iter,
        converged,
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

fn max_abs(a: &[f64]) -> f64 {
    a.iter().fold(0.0, |m, v| m.max(v.abs()))
}

fn axpy(scale: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += scale * xi;
    }
}
