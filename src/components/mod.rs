pub mod graph_annotator;
