//! Toy model layer built on the autograd engine: neurons, layers, and an MLP.
//!
//! Parameters are graph leaves held by [`NodeId`](crate::autograd::NodeId); forward passes
//! take the graph explicitly and return [`Value`](crate::autograd::Value) handles.

mod activation;
mod layer;
mod mlp;
mod neuron;

pub use activation::{Activation, ParseActivationError};
pub use layer::Layer;
pub use mlp::Mlp;
pub use neuron::Neuron;

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::autograd::Graph;
    use crate::error::GradError;

    fn fixed_neuron(graph: &Graph, weights: &[f64], bias: f64) -> Neuron {
        let ids = weights.iter().map(|&w| graph.leaf(w).id()).collect();
        Neuron::from_parts(ids, graph.leaf(bias).id())
    }

    #[test]
    fn neuron_forward_is_affine() {
        let g = Graph::new();
        let n = fixed_neuron(&g, &[0.5, -2.0], 1.0);
        let x = [g.leaf(2.0), g.leaf(3.0)];
        let out = n.forward(&g, &x).unwrap();
        assert_abs_diff_eq!(out.data(), 1.0 + 1.0 - 6.0, epsilon = 1e-12);

        out.backward();
        assert_eq!(g.grad(n.weights()[0]), 2.0);
        assert_eq!(g.grad(n.weights()[1]), 3.0);
        assert_eq!(g.grad(n.bias()), 1.0);
        assert_eq!(x[0].grad(), 0.5);
    }

    #[test]
    fn neuron_rejects_wrong_input_length() {
        let g = Graph::new();
        let n = fixed_neuron(&g, &[1.0, 1.0, 1.0], 0.0);
        let x = [g.leaf(1.0), g.leaf(2.0)];
        let err = n.forward(&g, &x).unwrap_err();
        assert!(matches!(
            err,
            GradError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn layer_outputs_one_value_per_neuron() {
        let g = Graph::new();
        let layer = Layer::from_neurons(vec![
            fixed_neuron(&g, &[1.0, 0.0], 0.0),
            fixed_neuron(&g, &[0.0, 1.0], 0.5),
        ]);
        let out = layer.forward(&g, &[g.leaf(3.0), g.leaf(4.0)]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].data(), 3.0);
        assert_eq!(out[1].data(), 4.5);
        assert_eq!(layer.parameters().count(), 6);
    }

    #[test]
    fn mlp_shapes_and_parameter_count() {
        let g = Graph::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mlp = Mlp::new(&g, 3, &[4, 4, 1], Activation::Tanh, &mut rng).unwrap();
        assert_eq!(mlp.num_params(), (3 + 1) * 4 + (4 + 1) * 4 + (4 + 1));
        assert_eq!(mlp.parameters().len(), mlp.num_params());
        assert_eq!(g.len(), mlp.num_params());
        assert_eq!(mlp.activation(), Activation::Tanh);

        let widths: Vec<_> = mlp.layers().iter().map(Layer::len).collect();
        assert_eq!(widths, vec![4, 4, 1]);
        let fan_in: Vec<_> = mlp
            .layers()
            .iter()
            .map(|l| l.neurons()[0].features())
            .collect();
        assert_eq!(fan_in, vec![3, 4, 4]);

        let out = mlp.forward_raw(&g, &[2.0, 3.0, -1.0]).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].data().abs() < 1.0);
    }

    #[test]
    fn mlp_parameters_are_initialised_in_range() {
        let g = Graph::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mlp = Mlp::new(&g, 5, &[8], Activation::Relu, &mut rng).unwrap();
        for p in mlp.parameters() {
            let w = g.data(p);
            assert!((-1.0..1.0).contains(&w), "{w} out of range");
            assert_eq!(g.grad(p), 0.0);
        }
    }

    #[test]
    fn mlp_rejects_wrong_input_width() {
        let g = Graph::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mlp = Mlp::new(&g, 3, &[2], Activation::Tanh, &mut rng).unwrap();
        assert!(matches!(
            mlp.forward_raw(&g, &[1.0, 2.0]),
            Err(GradError::LengthMismatch { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "belongs to a different graph")]
    fn mlp_cannot_run_on_another_graph() {
        let params = Graph::new();
        let other = Graph::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mlp = Mlp::new(&params, 1, &[1], Activation::Identity, &mut rng).unwrap();
        other.leaf(100.0);
        other.leaf(200.0);
        let _ = mlp.forward_raw(&other, &[1.0]);
    }

    #[test]
    fn zero_grad_and_step_update_parameters() {
        let g = Graph::new();
        let neuron = fixed_neuron(&g, &[2.0], 0.0);
        let mlp = Mlp::from_layers(1, vec![Layer::from_neurons(vec![neuron])], Activation::Identity);

        let out = mlp.forward_raw(&g, &[3.0]).unwrap();
        out[0].backward();
        let w = mlp.parameters()[0];
        assert_eq!(g.grad(w), 3.0);

        mlp.step(&g, 0.1);
        assert_abs_diff_eq!(g.data(w), 2.0 - 0.3, epsilon = 1e-12);

        mlp.zero_grad(&g);
        assert!(mlp.parameters().iter().all(|&p| g.grad(p) == 0.0));
    }

    #[test]
    fn activations_apply_and_parse() {
        let g = Graph::new();
        let x = g.leaf(-0.5);
        assert_eq!(Activation::Relu.apply(x).data(), 0.0);
        assert_eq!(Activation::Identity.apply(x), x);
        assert_abs_diff_eq!(Activation::Tanh.apply(x).data(), (-0.5f64).tanh(), epsilon = 1e-12);

        assert_eq!("ReLU".parse::<Activation>().unwrap(), Activation::Relu);
        assert_eq!(" gelu ".parse::<Activation>().unwrap(), Activation::Gelu);
        assert!("sigmoid".parse::<Activation>().is_err());
        assert_eq!(Activation::default().to_string(), "tanh");
    }

    #[test]
    fn mlp_display_lists_layers() {
        let g = Graph::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mlp = Mlp::new(&g, 3, &[4, 1], Activation::Gelu, &mut rng).unwrap();
        assert_eq!(
            mlp.to_string(),
            "MLP(Layer(3 -> 4, gelu), Layer(4 -> 1, gelu))"
        );
    }
}
