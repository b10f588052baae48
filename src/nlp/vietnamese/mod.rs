pub mod distribute;
pub mod g2p;
pub mod normalizer;
pub mod segmenter;
