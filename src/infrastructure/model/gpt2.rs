//! GPT-2 causal language model on candle

use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{embedding, layer_norm, Embedding, LayerNorm, VarBuilder};
use serde::Deserialize;

/// Subset of the Hugging Face `config.json` needed to rebuild the network
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gpt2Config {
    pub vocab_size: usize,
    pub n_positions: usize,
    pub n_embd: usize,
    pub n_layer: usize,
    pub n_head: usize,
    #[serde(default = "default_layer_norm_epsilon")]
    pub layer_norm_epsilon: f64,
}

fn default_layer_norm_epsilon() -> f64 {
    1e-5
}

impl Gpt2Config {
    /// The 124M parameter checkpoint published as `gpt2`
    pub fn gpt2_small() -> Self {
        Self {
            vocab_size: 50257,
            n_positions: 1024,
            n_embd: 768,
            n_layer: 12,
            n_head: 12,
            layer_norm_epsilon: 1e-5,
        }
    }
}

/// GPT-2 "Conv1D": a linear layer stored as `[in, out]`
#[derive(Debug, Clone)]
struct Conv1D {
    weight: Tensor,
    bias: Tensor,
}

impl Conv1D {
    fn load(n_in: usize, n_out: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            weight: vb.get((n_in, n_out), "weight")?,
            bias: vb.get(n_out, "bias")?,
        })
    }
}

impl Module for Conv1D {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        xs.broadcast_matmul(&self.weight)?.broadcast_add(&self.bias)
    }
}

#[derive(Debug, Clone)]
struct Attention {
    c_attn: Conv1D,
    c_proj: Conv1D,
    n_head: usize,
    n_embd: usize,
}

impl Attention {
    fn load(config: &Gpt2Config, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            c_attn: Conv1D::load(config.n_embd, 3 * config.n_embd, vb.pp("c_attn"))?,
            c_proj: Conv1D::load(config.n_embd, config.n_embd, vb.pp("c_proj"))?,
            n_head: config.n_head,
            n_embd: config.n_embd,
        })
    }

    fn forward(&self, xs: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
        let (b, t, _) = xs.dims3()?;
        let head_dim = self.n_embd / self.n_head;

        let qkv = self.c_attn.forward(xs)?;
        let split = |idx: usize| -> candle_core::Result<Tensor> {
            qkv.narrow(2, idx * self.n_embd, self.n_embd)?
                .reshape((b, t, self.n_head, head_dim))?
                .transpose(1, 2)?
                .contiguous()
        };
        let (q, k, v) = (split(0)?, split(1)?, split(2)?);

        let scale = 1.0 / (head_dim as f64).sqrt();
        let scores = (q.matmul(&k.t()?.contiguous()?)? * scale)?.broadcast_add(mask)?;
        let weights = candle_nn::ops::softmax_last_dim(&scores)?;

        let out = weights
            .matmul(&v)?
            .transpose(1, 2)?
            .contiguous()?
            .reshape((b, t, self.n_embd))?;

        self.c_proj.forward(&out)
    }
}

#[derive(Debug, Clone)]
struct Mlp {
    c_fc: Conv1D,
    c_proj: Conv1D,
}

impl Mlp {
    fn load(config: &Gpt2Config, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            c_fc: Conv1D::load(config.n_embd, 4 * config.n_embd, vb.pp("c_fc"))?,
            c_proj: Conv1D::load(4 * config.n_embd, config.n_embd, vb.pp("c_proj"))?,
        })
    }
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        // gelu() is the tanh approximation GPT-2 was trained with
        self.c_proj.forward(&self.c_fc.forward(xs)?.gelu()?)
    }
}

#[derive(Debug, Clone)]
struct Block {
    ln_1: LayerNorm,
    attn: Attention,
    ln_2: LayerNorm,
    mlp: Mlp,
}

impl Block {
    fn load(config: &Gpt2Config, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            ln_1: layer_norm(config.n_embd, config.layer_norm_epsilon, vb.pp("ln_1"))?,
            attn: Attention::load(config, vb.pp("attn"))?,
            ln_2: layer_norm(config.n_embd, config.layer_norm_epsilon, vb.pp("ln_2"))?,
            mlp: Mlp::load(config, vb.pp("mlp"))?,
        })
    }

    fn forward(&self, xs: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
        let xs = (xs + self.attn.forward(&self.ln_1.forward(xs)?, mask)?)?;
        &xs + self.mlp.forward(&self.ln_2.forward(&xs)?)?
    }
}

/// GPT-2 language model head over a single sequence
#[derive(Debug, Clone)]
pub struct Gpt2 {
    wte: Embedding,
    wpe: Embedding,
    blocks: Vec<Block>,
    ln_f: LayerNorm,
    config: Gpt2Config,
    device: Device,
}

impl Gpt2 {
    /// Builds the network from checkpoint tensors
    ///
    /// Accepts both bare (`wte.weight`) and `transformer.`-prefixed names.
    pub fn load(config: Gpt2Config, vb: VarBuilder) -> candle_core::Result<Self> {
        let vb = if vb.contains_tensor("wte.weight") {
            vb
        } else {
            vb.pp("transformer")
        };

        let wte = embedding(config.vocab_size, config.n_embd, vb.pp("wte"))?;
        let wpe = embedding(config.n_positions, config.n_embd, vb.pp("wpe"))?;
        let blocks = (0..config.n_layer)
            .map(|i| Block::load(&config, vb.pp(format!("h.{}", i))))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let ln_f = layer_norm(config.n_embd, config.layer_norm_epsilon, vb.pp("ln_f"))?;

        Ok(Self {
            wte,
            wpe,
            blocks,
            ln_f,
            device: vb.device().clone(),
            config,
        })
    }

    pub fn config(&self) -> &Gpt2Config {
        &self.config
    }

    /// Softmax over the vocabulary for the position after the last token
    pub fn next_token_probabilities(
        &self,
        input_ids: &[u32],
        attention_mask: &[u32],
    ) -> candle_core::Result<Vec<f32>> {
        let t = input_ids.len();
        if t == 0 {
            candle_core::bail!("cannot score an empty sequence");
        }
        if t > self.config.n_positions {
            candle_core::bail!(
                "sequence of {} tokens exceeds the context window of {}",
                t,
                self.config.n_positions
            );
        }
        if attention_mask.len() != t {
            candle_core::bail!(
                "attention mask has {} entries for {} tokens",
                attention_mask.len(),
                t
            );
        }

        let ids = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        let positions = Tensor::arange(0u32, t as u32, &self.device)?.unsqueeze(0)?;
        let mut hidden = (self.wte.forward(&ids)? + self.wpe.forward(&positions)?)?;

        let mask = self.attention_bias(attention_mask)?;
        for block in &self.blocks {
            hidden = block.forward(&hidden, &mask)?;
        }

        let last = self.ln_f.forward(&hidden)?.narrow(1, t - 1, 1)?.squeeze(1)?;
        let logits = last.matmul(&self.wte.embeddings().t()?)?;

        candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()
    }

    /// Additive `(t, t)` bias: causal, with masked-out keys excluded
    fn attention_bias(&self, attention_mask: &[u32]) -> candle_core::Result<Tensor> {
        let t = attention_mask.len();
        let bias: Vec<f32> = (0..t)
            .flat_map(|i| {
                (0..t).map(move |j| {
                    if j > i || attention_mask[j] == 0 {
                        f32::NEG_INFINITY
                    } else {
                        0.0
                    }
                })
            })
            .collect();

        Tensor::from_vec(bias, (t, t), &self.device)
    }
}
