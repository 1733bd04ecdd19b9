mod layer_linear;
mod layer_relu;
