use ndarray::{Array, Array2, ArrayView1, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;


pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Center ("in") and context ("out") vectors, one row per vocabulary id.
pub struct Embeddings {
    w_in: Array2<f32>,
    w_out: Array2<f32>,
}

impl Embeddings {

    /// Every entry uniform in `[-0.5/D, 0.5/D)`; `w_in` is drawn fully before `w_out`.
    pub fn new<R: Rng>(vocab_size: usize, embedding_dim: usize, rng: &mut R) -> Embeddings {

        let bound = 0.5 / embedding_dim as f32;
        let dist = Uniform::new(-bound, bound);

        let w_in = Array::random_using((vocab_size, embedding_dim), dist, rng);
        let w_out = Array::random_using((vocab_size, embedding_dim), dist, rng);
        Self { w_in, w_out }
    }

    /// Panics when the two matrices differ in shape.
    pub fn from_arrays(w_in: Array2<f32>, w_out: Array2<f32>) -> Embeddings {
        assert_eq!(w_in.dim(), w_out.dim(), "inconsistent shapes for center and context matrices");
        Self { w_in, w_out }
    }

    pub fn vocab_size(&self) -> usize {
        self.w_in.dim().0
    }

    pub fn dim(&self) -> usize {
        self.w_in.dim().1
    }

    pub fn w_in(&self) -> &Array2<f32> {
        &self.w_in
    }

    pub fn w_out(&self) -> &Array2<f32> {
        &self.w_out
    }

    pub fn center(&self, id: usize) -> ArrayView1<f32> {
        self.w_in.row(id)
    }

    pub fn context(&self, id: usize) -> ArrayView1<f32> {
        self.w_out.row(id)
    }

    pub fn score(&self, center: usize, context: usize) -> f32 {
        self.center(center).dot(&self.context(context))
    }

    /// One logistic step towards `label` (1 for a true context, 0 for a negative).
    /// Both rows are updated from their values before the step. Returns the
    /// prediction made before the update.
    pub fn update(&mut self, center: usize, context: usize, label: f32, learning_rate: f32) -> f32 {

        let pred = sigmoid(self.score(center, context));
        let g = learning_rate * (label - pred);

        let u = self.w_in.row_mut(center);
        let v = self.w_out.row_mut(context);
        Zip::from(u).and(v).for_each(|u_d, v_d| {
            let u_old = *u_d;
            let v_old = *v_d;
            *u_d += g * v_old;
            *v_d += g * u_old;
        });

        pred
    }

    pub fn train_positive(&mut self, center: usize, context: usize, learning_rate: f32) -> f32 {
        self.update(center, context, 1.0, learning_rate)
    }

    pub fn train_negative(&mut self, center: usize, negative: usize, learning_rate: f32) -> f32 {
        self.update(center, negative, 0.0, learning_rate)
    }
}
