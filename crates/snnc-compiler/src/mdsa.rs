//! MDSA as a spiking network
//!
//! Each round `m` is a race against a shared clock. `rank_i_m` starts
//! pre-charged with `K * marks_i(m - 1) + r_i` (via its threshold and the
//! previous round's selectors) and counts clock ticks, so it first fires
//! `W - w_i` steps after the round starts: heavier nodes fire earlier.
//! `select_i_j_m` gates node `i` marking neighbour `j`; the first selector of
//! a group to fire inhibits its siblings and itself with `-H`, so exactly one
//! fires, once. `counter_j_m` sums the selectors pointing at `j` and never
//! fires; its current is the number of marks.
//!
//! Every neuron uses `du = 0, dv = 1`, all weights are integers and all state
//! stays integral, so the dynamics are exact in floating point.

use snnc_ir::{keys, AttributeValue, Attrs, NeuronId, SnnGraph};

use crate::input::{AlgProps, InputGraph};
use crate::{CompilerError, Result, STAGE_BUILT};

/// Registry name of the algorithm
pub const ALGORITHM_NAME: &str = "MDSA";

/// Timing constants of a compiled MDSA network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdsaLayout {
    /// Input graph node count
    pub n: usize,
    /// Rounds after the degree round
    pub m_val: usize,
}

impl MdsaLayout {
    /// Layout for `n` nodes and `m_val` rounds; fails when the timing
    /// constants overflow an `i64`
    pub fn new(n: usize, m_val: usize) -> Result<Self> {
        let inhibition = n
            .checked_add(1)
            .and_then(|n1| n1.checked_mul(n))
            .and_then(|w| i64::try_from(w).ok())
            .and_then(|w| {
                let rounds = i64::try_from(m_val).ok()?.checked_add(1)?;
                rounds.checked_mul(w.checked_add(2)?)?.checked_add(2)?.checked_mul(2)
            });
        if inhibition.is_none() {
            return Err(CompilerError::config(format!(
                "MDSA timing overflows for {} nodes and m_val={}",
                n, m_val
            )));
        }
        Ok(Self { n, m_val })
    }

    /// Weight multiplier `K = n`
    pub fn k(&self) -> i64 {
        self.n as i64
    }

    /// Upper bound on any node weight, `W = n * (n + 1)`
    pub fn w(&self) -> i64 {
        (self.n * (self.n + 1)) as i64
    }

    /// First step on which `clock_m` fires, `S_m = 1 + m * (W + 2)`
    pub fn round_start(&self, m: usize) -> i64 {
        1 + m as i64 * (self.w() + 2)
    }

    /// Steps after which every counter of round `m_val` holds its final value
    pub fn sim_duration(&self) -> u64 {
        self.round_start(self.m_val + 1) as u64
    }

    /// Selector inhibition; larger than any excitation a run of up to
    /// `2 * sim_duration + 1` steps can deliver
    pub fn inhibition(&self) -> i64 {
        2 * (self.sim_duration() as i64 + 1)
    }
}

fn neuron_attrs(bias: f64, vth: f64) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.insert(keys::BIAS.into(), AttributeValue::Float(bias));
    attrs.insert(keys::DU.into(), AttributeValue::Float(0.0));
    attrs.insert(keys::DV.into(), AttributeValue::Float(1.0));
    attrs.insert(keys::VTH.into(), AttributeValue::Float(vth));
    attrs.insert(keys::U.into(), AttributeValue::Float(0.0));
    attrs.insert(keys::V.into(), AttributeValue::Float(0.0));
    attrs.insert(keys::SPIKES.into(), AttributeValue::Bool(false));
    attrs.insert(keys::IS_REDUNDANT.into(), AttributeValue::Bool(false));
    attrs
}

/// Compile `input` into an MDSA network for rounds `0..=m_val`.
/// Identical inputs give identical graphs; the result carries stage 1.
pub fn compile(input: &InputGraph, props: &AlgProps, m_val: usize) -> Result<SnnGraph> {
    props.check_covers(input)?;
    let n = input.node_count();
    let layout = MdsaLayout::new(n, m_val)?;
    let (k, w, h) = (layout.k(), layout.w(), layout.inhibition());

    let mut graph = SnnGraph::new()
        .with_attr(keys::ALGORITHM, ALGORITHM_NAME)
        .with_attr(keys::M_VAL, m_val as i64)
        .with_attr(keys::INPUT_SIZE, n as i64)
        .with_attr(keys::SIM_DURATION, layout.sim_duration() as i64)
        .with_attr(keys::INHIBITION, h);

    let hoods: Vec<Vec<usize>> = (0..n).map(|i| input.closed_neighbourhood(i)).collect();

    for m in 0..=m_val {
        let clock = NeuronId::clock(m);
        graph.add_neuron(clock, neuron_attrs(1.0, layout.round_start(m) as f64))?;

        for i in 0..n {
            let pre_charge = if m == 0 { k * input.degree(i) as i64 } else { 0 };
            let vth = w - props.rand_ranks()[i] as i64 - pre_charge;
            graph.add_neuron(NeuronId::rank(i, m), neuron_attrs(0.0, vth as f64))?;
            graph.add_neuron(NeuronId::counter(i, m), neuron_attrs(0.0, (n + 1) as f64))?;
        }
        for (i, hood) in hoods.iter().enumerate() {
            for &j in hood {
                graph.add_neuron(NeuronId::selector(i, j, m), neuron_attrs(0.0, 1.0))?;
            }
        }

        for i in 0..n {
            graph.connect(clock, NeuronId::rank(i, m), 1)?;
        }
        for (i, hood) in hoods.iter().enumerate() {
            for &j in hood {
                let sel = NeuronId::selector(i, j, m);
                graph.connect(NeuronId::rank(j, m), sel, 1)?;
                for &other in hood {
                    graph.connect(NeuronId::selector(i, other, m), sel, -h)?;
                }
                graph.connect(sel, NeuronId::counter(j, m), 1)?;
                if m < m_val {
                    // Marks of this round pre-charge j's rank in the next one
                    graph.connect(sel, NeuronId::rank(j, m + 1), k)?;
                }
            }
        }
    }

    graph.mark_stage_completed(STAGE_BUILT)?;
    log::info!(
        "Compiled {} for {} nodes, m_val={}: {} neurons, {} synapses, duration {}",
        ALGORITHM_NAME,
        n,
        m_val,
        graph.neuron_count(),
        graph.synapse_count(),
        layout.sim_duration()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::input_graph;

    #[test]
    fn layout_constants() {
        let l = MdsaLayout::new(2, 0).unwrap();
        assert_eq!(l.w(), 6);
        assert_eq!(l.round_start(0), 1);
        assert_eq!(l.round_start(1), 9);
        assert_eq!(l.sim_duration(), 9);
        assert_eq!(l.inhibition(), 20);
    }

    #[test]
    fn oversized_m_val_is_config_error() {
        assert!(matches!(MdsaLayout::new(2, usize::MAX), Err(CompilerError::Configuration { .. })));
        let g = input_graph(2, 0).unwrap();
        let err = compile(&g, &AlgProps::from_seed(2, 0), usize::MAX).unwrap_err();
        assert!(matches!(err, CompilerError::Configuration { .. }));
    }

    #[test]
    fn ranks_must_match_node_count() {
        let g = input_graph(4, 0).unwrap();
        let short = AlgProps::new(vec![1, 0]).unwrap();
        assert!(matches!(compile(&g, &short, 1), Err(CompilerError::Configuration { .. })));
    }

    #[test]
    fn neuron_and_synapse_counts() {
        let g = input_graph(4, 0).unwrap();
        let snn = compile(&g, &AlgProps::from_seed(4, 0), 1).unwrap();
        // per round: clock + 4 ranks + 4 counters + sum(|N[i]|) = 2+2+4+2 = 10 selectors
        assert_eq!(snn.neuron_count(), 2 * (1 + 4 + 4 + 10));
        // per round: 4 clock->rank; per selector: rank->sel, counter; plus |N[i]| inhibition each
        let inhibit: usize = (0..4).map(|i| g.closed_neighbourhood(i).len().pow(2)).sum();
        let per_round = 4 + 10 * 2 + inhibit;
        assert_eq!(snn.synapse_count(), 2 * per_round + 10);
        assert_eq!(snn.completed_stages(), &[STAGE_BUILT]);
    }

    #[test]
    fn parameters_follow_degree_and_rank() {
        let g = input_graph(4, 0).unwrap();
        let props = AlgProps::new(vec![3, 0, 1, 2]).unwrap();
        let snn = compile(&g, &props, 1).unwrap();
        let vth = |id: NeuronId| snn.neuron(&id).unwrap()[keys::VTH].as_float().unwrap();
        // W = 20, K = 4
        assert_eq!(vth(NeuronId::rank(2, 0)), 20.0 - 1.0 - 12.0);
        assert_eq!(vth(NeuronId::rank(2, 1)), 19.0);
        assert_eq!(vth(NeuronId::clock(1)), 23.0);
        assert_eq!(vth(NeuronId::counter(0, 0)), 5.0);
        assert_eq!(snn.graph_attr(keys::SIM_DURATION), Some(&AttributeValue::Int(45)));
    }

    #[test]
    fn all_weights_are_int() {
        let g = input_graph(5, 1).unwrap();
        let snn = compile(&g, &AlgProps::from_seed(5, 9), 2).unwrap();
        assert!(snn.synapses().iter().all(|s| matches!(s.weight(), Some(AttributeValue::Int(_)))));
    }
}
