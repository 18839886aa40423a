//! Composes the four per-equation capability providers over the sparse
//! stencil into the three sweeps the step controller drives each stage
//! through : precompute, viscosity/`tau_max`, low-order
//! update. Node ordering and constrained-row skipping come from
//! [`crate::stencil::active_nodes`]; the actual per-node work here is
//! sequential — parallelizing the scatter into `StateVector`'s
//! structure-of-arrays storage needs split-mutable-borrow bookkeeping
//! `hv-kernel` does not yet do (tracked as a follow-up, not a silent gap:
//! `par_for_each_row_block` is still the primitive `hv-step` dispatches
//! through for cancellation, it simply runs one block at a time here).

use hv_core::{
    HyperbolicSystemView, Indicator, Limiter, NodeIndex, PrecomputedArray, PrecomputedVector, Real,
    RiemannSolver, StateArray, StateVector,
};
use hv_offline::OfflineData;

use crate::stencil::active_nodes;

/// Runs both precompute cycles (barrier-separated by the one-ring min-fold)
/// for every node, including constrained/ghost nodes (precompute has no
/// notion of "active" — only the low-order/limiter sweeps skip constrained
/// rows).
pub fn precompute<S: HyperbolicSystemView>(
    system: &S,
    offline: &dyn OfflineData,
    state: &StateVector,
) -> PrecomputedVector {
    let n = state.len();
    let sparsity = offline.sparsity();
    let mut precomputed = PrecomputedVector::zeros(S::NUM_PRECOMPUTED, n);
    let mut fold_seed = vec![Real::INFINITY; n];

    for idx in 0..n {
        let mut u = [0.0; hv_core::MAX_COMPONENTS];
        state.get(NodeIndex::from_index(idx), &mut u);
        let cycle0 = system.precompute_cycle0(&u);
        precomputed.set(NodeIndex::from_index(idx), &cycle0);
        fold_seed[idx] = system.precompute_fold_seed(&cycle0);
    }

    if S::NUM_PRECOMPUTE_CYCLES < 2 {
        return precomputed;
    }

    for idx in 0..n {
        let mut u = [0.0; hv_core::MAX_COMPONENTS];
        state.get(NodeIndex::from_index(idx), &mut u);
        let mut cycle0 = [0.0; hv_core::MAX_PRECOMPUTED];
        precomputed.get(NodeIndex::from_index(idx), &mut cycle0);
        // Fold by minimum over the full one-ring, not just the node's own
        // seed, so `gamma_min` (Euler-AEOS) is genuinely the smallest
        // surrogate gamma seen by any neighbor, including `idx` itself.
        let mut folded = fold_seed[idx];
        for (j, _c, _n) in sparsity.row(idx).neighbors() {
            folded = folded.min(fold_seed[j.index()]);
        }
        let cycle1 = system.precompute_cycle1(&u, &cycle0, folded);
        precomputed.set(NodeIndex::from_index(idx), &cycle1);
    }

    precomputed
}

fn gather(state: &StateVector, precomputed: &PrecomputedVector, idx: usize) -> (StateArray, PrecomputedArray) {
    let mut u = [0.0; hv_core::MAX_COMPONENTS];
    let mut p = [0.0; hv_core::MAX_PRECOMPUTED];
    state.get(NodeIndex::from_index(idx), &mut u);
    precomputed.get(NodeIndex::from_index(idx), &mut p);
    (u, p)
}

/// One-ring graph viscosity `d_ij = lambda_max(i,j) * |c_ij|` summed per
/// node, and the resulting CFL-style `tau_max = min_i m_i / (2 sum_j d_ij)`.
pub fn compute_tau_max<S, R>(
    system: &S,
    riemann: &R,
    offline: &dyn OfflineData,
    state: &StateVector,
    precomputed: &PrecomputedVector,
) -> Real
where
    S: HyperbolicSystemView,
    R: RiemannSolver<S>,
{
    let sparsity = offline.sparsity();
    let lumped_mass = offline.lumped_mass();
    let mut tau_max = Real::INFINITY;

    for i in active_nodes(sparsity, &offline.partition()) {
        let (u_i, p_i) = gather(state, precomputed, i);
        let row = sparsity.row(i);
        let mut d_sum = 0.0;
        for (j, _c, n_ij) in row.neighbors() {
            let (u_j, p_j) = gather(state, precomputed, j.index());
            let result = riemann.compute(system, &u_i, &p_i, &u_j, &p_j, n_ij);
            let norm = row.norm_cij[row.columns.iter().position(|&c| c == j).unwrap()];
            d_sum += result.lambda_max * norm;
        }
        if d_sum > 0.0 {
            let tau_i = lumped_mass[i] / (2.0 * d_sum);
            tau_max = tau_max.min(tau_i);
        }
    }

    tau_max
}

/// Low-order graph-viscosity update: `u_i' = u_i - (tau/m_i) * sum_j [
/// F(u_j).c_ij - d_ij (u_j - u_i) ]`, invariant-domain preserving under the
/// CFL condition `tau <= tau_max`.
pub fn low_order_update<S, R>(
    system: &S,
    riemann: &R,
    offline: &dyn OfflineData,
    state: &StateVector,
    precomputed: &PrecomputedVector,
    tau: Real,
) -> StateVector
where
    S: HyperbolicSystemView,
    R: RiemannSolver<S>,
{
    let sparsity = offline.sparsity();
    let lumped_mass = offline.lumped_mass();
    let mut next = state.clone();

    for i in active_nodes(sparsity, &offline.partition()) {
        let (u_i, p_i) = gather(state, precomputed, i);
        let row = sparsity.row(i);
        let mut residual = [0.0; hv_core::MAX_COMPONENTS];

        for (j, c_ij, n_ij) in row.neighbors() {
            let (u_j, p_j) = gather(state, precomputed, j.index());
            let mut flux_j = [0.0; hv_core::MAX_COMPONENTS];
            system.flux(&u_j, &p_j, n_ij, &mut flux_j);
            let norm = row.norm_cij[row.columns.iter().position(|&c| c == j).unwrap()];
            let result = riemann.compute(system, &u_i, &p_i, &u_j, &p_j, n_ij);
            let d_ij = result.lambda_max * norm;
            let _ = c_ij;
            for c in 0..S::NUM_COMPONENTS {
                residual[c] += flux_j[c] * norm - d_ij * (u_j[c] - u_i[c]);
            }
        }

        let m_i = lumped_mass[i];
        let mut u_next = u_i;
        for c in 0..S::NUM_COMPONENTS {
            u_next[c] -= (tau / m_i) * residual[c];
        }
        next.set(NodeIndex::from_index(i), &u_next);
    }

    next
}

/// Per-node blend weight `alpha_i in [0, 1]` from an [`Indicator`], gathered
/// once up front so every limiter iteration of
/// [`high_order_limited_update`] reuses the same values.
fn node_indicators<S, I>(
    system: &S,
    indicator: &I,
    offline: &dyn OfflineData,
    state: &StateVector,
    precomputed: &PrecomputedVector,
) -> Vec<Real>
where
    S: HyperbolicSystemView,
    I: Indicator<S>,
{
    let sparsity = offline.sparsity();
    let mut alpha = vec![0.0; state.len()];
    for i in active_nodes(sparsity, &offline.partition()) {
        let (u_i, p_i) = gather(state, precomputed, i);
        let row = sparsity.row(i);
        let a = indicator.node_indicator(
            system,
            &u_i,
            &p_i,
            row,
            &|col| gather(state, precomputed, row.columns[col].index()).0,
            &|col| gather(state, precomputed, row.columns[col].index()).1,
);
        alpha[i] = a.clamp(0.0, 1.0);
    }
    alpha
}

/// Antidiffusive-flux assembly and iterated limiting. Candidate per-edge correction:
/// `P_ij = tau * alpha_ij * d_ij * (u_j^n - u_i^n)`, the portion of the
/// low-order scheme's graph viscosity the blend weight `alpha_ij =
/// min(alpha_i, alpha_j)` elects
/// to give back; `l_ij in [0, 1]` from the [`Limiter`] then scales how much
/// of that correction each edge may safely apply. Returns the limited state
/// and the per-node `alpha` used, both of which the step controller
/// reports to the caller.
///
/// `rk_states` holds optional read-only RK stage contributions with
/// weights `omega_s` : the state entering the antidiffusive
/// flux is the weighted blend `(1 - sum omega_s) u^n + sum omega_s
/// u^{s,n}` rather than `u^n` alone, approximating the spec's flux blend
/// by blending the states the flux is evaluated from.
pub fn high_order_limited_update<S, R, I, L>(
    system: &S,
    riemann: &R,
    indicator: &I,
    limiter: &L,
    offline: &dyn OfflineData,
    state: &StateVector,
    precomputed: &PrecomputedVector,
    low_order: &StateVector,
    rk_states: &[(&StateVector, Real)],
    tau: Real,
    limiter_iterations: u32,
) -> (StateVector, Vec<Real>)
where
    S: HyperbolicSystemView,
    R: RiemannSolver<S>,
    I: Indicator<S>,
    L: Limiter<S>,
{
    let sparsity = offline.sparsity();
    let lumped_mass = offline.lumped_mass();
    let active = active_nodes(sparsity, &offline.partition());
    let alpha = node_indicators(system, indicator, offline, state, precomputed);

    let stage_weight_sum: Real = rk_states.iter().map(|(_, w)| *w).sum();
    let effective_state = |idx: usize| -> StateArray {
        let mut u = gather(state, precomputed, idx).0;
        for c in 0..S::NUM_COMPONENTS {
            u[c] *= 1.0 - stage_weight_sum;
        }
        for (stage, weight) in rk_states {
            let mut u_s = [0.0; hv_core::MAX_COMPONENTS];
            stage.get(NodeIndex::from_index(idx), &mut u_s);
            for c in 0..S::NUM_COMPONENTS {
                u[c] += weight * u_s[c];
            }
        }
        u
    };

    let mut current = low_order.clone();
    for _ in 0..limiter_iterations.max(1) {
        let bounds: Vec<_> = active
            .iter()
            .map(|&i| {
                let u_i = gather(&current, precomputed, i).0;
                let row = sparsity.row(i);
                limiter.node_bounds(system, &u_i, row, &|col| {
                    gather(&current, precomputed, row.columns[col].index()).0
                })
            })
            .collect();
        let bounds_of: std::collections::HashMap<usize, _> =
            active.iter().copied().zip(bounds.iter().copied()).collect();

        let mut increment = vec![[0.0; hv_core::MAX_COMPONENTS]; state.len()];
        for &i in &active {
            let row = sparsity.row(i);
            let u_i_eff = effective_state(i);
            for (j, _c, n_ij) in row.neighbors() {
                let j_idx = j.index();
                if j_idx < i {
                    continue; // strict-upper edge walk; lower half mirrored below.
                }
                let u_i_n = gather(state, precomputed, i).0;
                let p_i = gather(state, precomputed, i).1;
                let u_j_n = gather(state, precomputed, j_idx).0;
                let p_j = gather(state, precomputed, j_idx).1;
                let norm = row.norm_cij[row.columns.iter().position(|&c| c == j).unwrap()];
                let result = riemann.compute(system, &u_i_n, &p_i, &u_j_n, &p_j, n_ij);
                let d_ij = result.lambda_max * norm;
                let alpha_ij = alpha[i].min(alpha[j_idx]);
                let u_j_eff = effective_state(j_idx);

                let mut p_ij = [0.0; hv_core::MAX_COMPONENTS];
                for c in 0..S::NUM_COMPONENTS {
                    p_ij[c] = tau * alpha_ij * d_ij * (u_j_eff[c] - u_i_eff[c]);
                }

                let u_i_low = gather(&current, precomputed, i).0;
                let u_j_low = gather(&current, precomputed, j_idx).0;
                let mut p_ji = p_ij;
                for c in 0..S::NUM_COMPONENTS {
                    p_ji[c] = -p_ji[c];
                }
                let l_i = bounds_of
                    .get(&i)
                    .map(|b| limiter.edge_limit(system, &u_i_low, &p_ij, b))
                    .unwrap_or(0.0);
                let l_j = bounds_of
                    .get(&j_idx)
                    .map(|b| limiter.edge_limit(system, &u_j_low, &p_ji, b))
                    .unwrap_or(0.0);
                let l_ij = l_i.min(l_j).clamp(0.0, 1.0);

                for c in 0..S::NUM_COMPONENTS {
                    increment[i][c] += l_ij * p_ij[c];
                    increment[j_idx][c] -= l_ij * p_ij[c];
                }
            }
        }

        let mut next = current.clone();
        for &i in &active {
            let u_low = gather(&current, precomputed, i).0;
            let m_i = lumped_mass[i];
            let mut u_next = u_low;
            for c in 0..S::NUM_COMPONENTS {
                u_next[c] += increment[i][c] / m_i;
            }
            next.set(NodeIndex::from_index(i), &u_next);
        }
        current = next;
    }

    (current, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::NodeIndex as Idx;
    use hv_equations::{EulerAeos, PolytropicGasEos};
    use hv_offline::{InMemoryOfflineData, Line1DBuilder};
    use hv_riemann::{GuermondPopovSolver, RiemannConfig};

    fn uniform_sod_mesh(n: usize) -> (InMemoryOfflineData, StateVector) {
        let offline = Line1DBuilder::new(n, 1.0).build().unwrap();
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let mut state = StateVector::zeros(EulerAeos::<PolytropicGasEos, 1>::NUM_COMPONENTS, n);
        let u = system.from_primitive(&[1.0, 0.0, 2.5, 0.0, 0.0]);
        for i in 0..n {
            state.set(Idx::from_index(i), &u);
        }
        (offline, state)
    }

    #[test]
    fn uniform_state_has_zero_viscosity_residual() {
        let (offline, state) = uniform_sod_mesh(6);
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let precomputed = precompute(&system, &offline, &state);
        let solver = GuermondPopovSolver::new(RiemannConfig::default());
        let tau_max = compute_tau_max(&system, &solver, &offline, &state, &precomputed);
        assert!(tau_max.is_finite());
        let next = low_order_update(&system, &solver, &offline, &state, &precomputed, tau_max * 0.1);
        for i in 1..5 {
            let mut u = [0.0; hv_core::MAX_COMPONENTS];
            next.get(Idx::from_index(i), &mut u);
            let mut u0 = [0.0; hv_core::MAX_COMPONENTS];
            state.get(Idx::from_index(i), &mut u0);
            assert!((u[0] - u0[0]).abs() < 1e-8, "density should not drift on a uniform state");
        }
    }

    #[test]
    fn high_order_update_preserves_uniform_state() {
        use hv_limiter::{ConvexLimiter, OneIndicator};

        let (offline, state) = uniform_sod_mesh(6);
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let precomputed = precompute(&system, &offline, &state);
        let solver = GuermondPopovSolver::new(RiemannConfig::default());
        let tau_max = compute_tau_max(&system, &solver, &offline, &state, &precomputed);
        let tau = tau_max * 0.1;
        let low_order = low_order_update(&system, &solver, &offline, &state, &precomputed, tau);
        let indicator = OneIndicator;
        let limiter = ConvexLimiter::default();
        let (limited, alpha) = high_order_limited_update(
            &system,
            &solver,
            &indicator,
            &limiter,
            &offline,
            &state,
            &precomputed,
            &low_order,
            &[],
            tau,
            2,
);
        for i in 1..5 {
            let mut u = [0.0; hv_core::MAX_COMPONENTS];
            limited.get(Idx::from_index(i), &mut u);
            let mut u0 = [0.0; hv_core::MAX_COMPONENTS];
            state.get(Idx::from_index(i), &mut u0);
            assert!((u[0] - u0[0]).abs() < 1e-6, "density should not drift on a uniform state");
        }
        assert_eq!(alpha.len(), state.len());
    }
}
