pub mod common;
pub mod centrality;
pub mod community;
pub mod topology;
pub mod layout;

pub use common::{mean_and_std, AlgorithmError, GraphView, NodeIndex};
pub use centrality::{
    betweenness_centrality, bfs_distances, closeness_centrality, degree_centrality,
    eigenvector_centrality, EigenvectorConfig,
};
pub use community::{
    connected_components, greedy_modularity_communities, modularity, weighted_modularity,
    Components,
};
pub use topology::{average_clustering, clustering, count_triangles, density, triangles_per_node};
pub use layout::{
    circular_layout, grid_layout, radial_layout, random_layout, shell_layout, spring_layout,
    LayoutError, Position, SpringConfig,
};
