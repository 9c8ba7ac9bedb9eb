mod functional;
mod init;
mod layer_conv2d;
