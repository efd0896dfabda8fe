pub mod coordinate_maps;
