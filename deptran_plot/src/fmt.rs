use crate::figure::{Figure, Group};

pub struct PlotFmt;

impl PlotFmt {
    pub fn figure_title(figure: Figure) -> &'static str {
        match figure {
            Figure::Fig5a => "throughput and latency with increasing load",
            Figure::Fig5b => "latency distribution per experiment",
            Figure::Fig6a => "throughput and latency with increasing load",
            Figure::Fig6b => "leader vs follower latency distribution",
        }
    }

    pub fn x_label(figure: Figure) -> &'static str {
        match figure {
            Figure::Fig5a | Figure::Fig6a => "concurrency",
            Figure::Fig5b | Figure::Fig6b => "experiment",
        }
    }

    pub fn group_name(group: Group) -> String {
        match group {
            Group::Replicas(n) => format!("{} replicas", n),
            Group::Leader => String::from("leader"),
            Group::Follower => String::from("follower"),
            Group::All => String::from("all"),
        }
    }
}
