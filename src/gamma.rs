// Paper over picture in linear light, so half-torn edges do not go muddy.
// One table decodes sRGB bytes; encoding searches that same table, which
// keeps every blend exactly invertible at the endpoints.

pub struct LinearBlend {
    decode: [f32; 256], // sRGB byte -> linear, ascending
}

impl LinearBlend {
    pub fn new() -> Self {
        Self {
            decode: std::array::from_fn(|v| {
                let c = v as f32 / 255.0;
                if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
            }),
        }
    }

    /// Nearest sRGB byte for a linear value.
    fn encode(&self, l: f32) -> u8 {
        let hi = self.decode.partition_point(|&d| d < l).min(u8::MAX as usize);
        if hi > 0 && l - self.decode[hi - 1] < self.decode[hi] - l {
            (hi - 1) as u8
        } else {
            hi as u8
        }
    }

    /// `over` weighted by `a` on top of `under`, both 0x00RRGGBB.
    /// Visual: a = 1 shows pure paper, a = 0 shows the layer underneath.
    pub fn mix(&self, under: u32, over: u32, a: f32) -> u32 {
        if a <= 0.0 {
            return under;
        }
        if a >= 1.0 {
            return over;
        }
        [16u32, 8, 0].into_iter().fold(0, |out, shift| {
            let u = self.decode[((under >> shift) & 0xFF) as usize];
            let o = self.decode[((over >> shift) & 0xFF) as usize];
            out | (self.encode(u + a * (o - u)) as u32) << shift
        })
    }
}
